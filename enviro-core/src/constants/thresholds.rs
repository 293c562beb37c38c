//! Descriptor Boundaries and Trend Gates
//!
//! Lower bounds are inclusive, upper bounds exclusive, unless noted.

// ===== PRESSURE DESCRIPTORS (hPa) =====

/// Below this: storm.
pub const PRESSURE_STORM_BELOW_HPA: f32 = 970.0;

/// Below this: rain.
pub const PRESSURE_RAIN_BELOW_HPA: f32 = 990.0;

/// Below this: change.
pub const PRESSURE_CHANGE_BELOW_HPA: f32 = 1010.0;

/// Below this: fair. At or above: dry.
pub const PRESSURE_FAIR_BELOW_HPA: f32 = 1030.0;

// ===== HUMIDITY DESCRIPTORS (%) =====

/// Comfortable band, both bounds exclusive.
pub const HUMIDITY_GOOD_ABOVE_PCT: f32 = 40.0;

/// Comfortable band upper bound (exclusive).
pub const HUMIDITY_GOOD_BELOW_PCT: f32 = 60.0;

// ===== LIGHT DESCRIPTORS (lux) =====

/// Below this: dark.
pub const LIGHT_DARK_BELOW_LUX: f32 = 20.0;

/// Below this: dim.
pub const LIGHT_DIM_BELOW_LUX: f32 = 100.0;

/// Below this: light. At or above: bright.
pub const LIGHT_LIGHT_BELOW_LUX: f32 = 500.0;

// ===== CORRECTION =====

/// Number of CPU temperature readings averaged for the self-heating correction.
pub const CPU_HISTORY_LEN: usize = 5;

/// Humidity change per degree of dewpoint depression.
pub const HUMIDITY_PER_DEWPOINT_DEGREE: f32 = 3.5;

/// Dewpoint depression per percent of relative humidity deficit.
pub const DEWPOINT_PCT_PER_DEGREE: f32 = 5.0;

// ===== TREND =====

/// Pressure samples kept for the regression window.
///
/// At the nominal 1 Hz tick this covers roughly 17 minutes.
pub const TREND_WINDOW_CAPACITY: usize = 1000;

/// Minimum R² before the trend symbol may change.
pub const TREND_CONFIDENCE_MIN_R2: f64 = 0.5;

/// Hourly change (hPa/h) above which the trend is directional.
pub const TREND_STEADY_HPA_PER_HOUR: f64 = 0.5;

/// Hourly change (hPa/h) above which a directional trend is rapid.
pub const TREND_RAPID_HPA_PER_HOUR: f64 = 3.0;
