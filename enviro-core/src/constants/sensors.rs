//! Sensor Limits
//!
//! Ranges a BME280-class sensor and an LTR-559 light sensor can actually
//! report. Anything outside is a driver glitch, not weather.

// ===== TEMPERATURE =====

/// Minimum operating temperature of the BME280 (°C).
///
/// Source: Bosch BME280 datasheet, operating range
pub const TEMP_SENSOR_MIN_C: f32 = -40.0;

/// Maximum operating temperature of the BME280 (°C).
///
/// Source: Bosch BME280 datasheet, operating range
pub const TEMP_SENSOR_MAX_C: f32 = 85.0;

// ===== HUMIDITY =====

/// Minimum relative humidity (%). Completely dry air.
pub const HUMIDITY_SENSOR_MIN_PCT: f32 = 0.0;

/// Maximum relative humidity (%). Saturated air.
pub const HUMIDITY_SENSOR_MAX_PCT: f32 = 100.0;

// ===== PRESSURE =====

/// Minimum measurable pressure (hPa).
///
/// Source: Bosch BME280 datasheet, 300-1100 hPa
pub const PRESSURE_SENSOR_MIN_HPA: f32 = 300.0;

/// Maximum measurable pressure (hPa).
pub const PRESSURE_SENSOR_MAX_HPA: f32 = 1100.0;

// ===== LIGHT =====

/// Minimum illuminance (lux).
pub const LIGHT_SENSOR_MIN_LUX: f32 = 0.0;

/// Maximum illuminance (lux). Direct sunlight is ~100k lux.
///
/// Source: LTR-559 datasheet, 0.01-64k lux dynamic range plus headroom
pub const LIGHT_SENSOR_MAX_LUX: f32 = 100_000.0;
