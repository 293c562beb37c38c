//! Acquisition, correction and trend-analysis engine for Enviro
//!
//! Turns raw BME-class samples (temperature, humidity, pressure) plus an
//! ambient light reading into corrected, classified and trend-annotated
//! telemetry, once per sampling tick.
//!
//! Key constraints:
//! - All mutable state lives in one [`Engine`] owned by the sampling loop
//! - No heap allocation in the tick path (fixed windows, `heapless` text)
//! - A bad sample never reaches the trend window or the correction history
//!
//! ```no_run
//! use enviro_core::{Engine, EngineConfig, SensorSample, TickInput};
//! use chrono::{DateTime, FixedOffset};
//!
//! let mut engine = Engine::new(EngineConfig::default(), 0);
//! let local_time = DateTime::from_timestamp(0, 0)
//!     .unwrap()
//!     .with_timezone(&FixedOffset::east_opt(0).unwrap());
//!
//! let input = TickInput {
//!     sample: SensorSample::new(0, 24.0, 45.0, 1013.0, 120.0),
//!     cpu_temperature: Some(48.0),
//!     local_time,
//!     sun_events: None,
//! };
//!
//! match engine.tick(&input) {
//!     Ok(output) => {}, // Render output.frame, maybe upload output.payload
//!     Err(e) => {},     // Skip this tick
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

// Optional logging, compiled out without the `log` feature
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

pub mod buffer;
pub mod classify;
pub mod constants;
pub mod correction;
pub mod engine;
pub mod errors;
pub mod frame;
pub mod range;
pub mod sample;
pub mod solar;
pub mod sun;
pub mod time;
pub mod traits;
pub mod trend;
pub mod upload;

// Public API
pub use classify::{HumidityLabel, LightLabel, PressureLabel};
pub use correction::{correct_humidity, CorrectedReading, CorrectionConfig, CorrectionModel};
pub use engine::{Engine, EngineConfig, TickInput, TickOutput};
pub use errors::{AstroError, SampleError, SampleResult};
pub use frame::Frame;
pub use range::TemperatureRange;
pub use sample::{RawReading, SampleGuard, SensorSample};
pub use solar::SolarCalculator;
pub use sun::{cycle_state, DayEvents, SunCycleState, SunEvents};
pub use time::Timestamp;
pub use traits::{CpuTemperatureSource, Renderer, SensorSource, SunEventSource, TelemetrySink};
pub use trend::{Trend, TrendAnalyzer, TrendResult};
pub use upload::{
    SchedulerConfig, SendOutcome, TelemetryPayload, UploadDecision, UploadScheduler, UploadState,
    UploadStats,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
