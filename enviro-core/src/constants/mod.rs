//! Constants for Enviro Core
//!
//! Centralised numeric values used by the engine. Every value carries its unit
//! in the name.
//!
//! ## Organization
//!
//! - **Sensors**: plausible ranges for the raw sample guard
//! - **Time**: tick cadence, warm-up and upload intervals
//! - **Thresholds**: descriptor boundaries and trend gates

/// Plausible ranges for raw sensor channels.
pub mod sensors;

/// Time-related constants for sampling, warm-up and uploads.
pub mod time;

/// Descriptor boundaries and trend classification gates.
pub mod thresholds;

pub use sensors::{
    HUMIDITY_SENSOR_MAX_PCT, HUMIDITY_SENSOR_MIN_PCT, LIGHT_SENSOR_MAX_LUX, LIGHT_SENSOR_MIN_LUX,
    PRESSURE_SENSOR_MAX_HPA, PRESSURE_SENSOR_MIN_HPA, TEMP_SENSOR_MAX_C, TEMP_SENSOR_MIN_C,
};

pub use time::{
    DEFAULT_TICK_DELAY_MS, DEFAULT_UPLOAD_INTERVAL_MS, DEFAULT_WARMUP_MS, MS_PER_SECOND,
    SECONDS_PER_HOUR,
};

pub use thresholds::{
    CPU_HISTORY_LEN, TREND_CONFIDENCE_MIN_R2, TREND_RAPID_HPA_PER_HOUR, TREND_STEADY_HPA_PER_HOUR,
    TREND_WINDOW_CAPACITY,
};
