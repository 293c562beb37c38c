//! Error Types for Sampling and Astronomical Lookups
//!
//! ## Design Philosophy
//!
//! Errors are returned once per tick from the sampling hot path, so they follow
//! the same rules as the rest of the engine:
//!
//! 1. **Small Size**: every variant carries at most three `f32`s.
//! 2. **No Heap Allocation**: messages are `&'static str`, never `String`.
//! 3. **Copy Semantics**: errors can be logged and dropped without moves.
//!
//! ## Error Categories
//!
//! ### Sample Faults ([`SampleError`])
//! - `InvalidValue`: NaN or infinity from a driver
//! - `OutOfRange`: a finite value no real sensor can report
//! - `SensorUnavailable`: the driver itself failed (bus error, missing file)
//!
//! A sample fault always means "skip this tick". None of the engine state
//! (trend window, CPU history, min/max range, upload state) is touched.
//!
//! ### Astronomical Faults ([`AstroError`])
//! - `NoSunrise` / `NoSunset`: polar night or polar day at the configured
//!   latitude, so the day/night split has no boundary on that date
//! - `InvalidDate`: the calendar arithmetic left chrono's range
//!
//! Astronomical faults are fatal at startup and reported per tick afterwards.
//!
//! ## Handling Strategy
//!
//! ```rust
//! use enviro_core::{SampleError, SampleGuard, SensorSample};
//!
//! let guard = SampleGuard::default();
//! let sample = SensorSample::new(1_000, f32::NAN, 45.0, 1013.0, 120.0);
//!
//! match guard.check(&sample) {
//!     Ok(()) => { /* feed the engine */ }
//!     Err(SampleError::InvalidValue { .. }) => { /* driver glitch, skip tick */ }
//!     Err(_) => { /* log and skip tick */ }
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for sample acquisition and validation
pub type SampleResult<T> = Result<T, SampleError>;

/// Transient sensor faults - kept small, returned every tick in the worst case
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SampleError {
    /// Value is NaN or infinite
    #[error("Invalid {channel} value: not a finite number")]
    InvalidValue {
        /// Channel that produced the value
        channel: &'static str,
    },

    /// Finite value outside what the sensor can physically report
    #[error("{channel} value {value} outside range [{min}, {max}]")]
    OutOfRange {
        /// Channel that produced the value
        channel: &'static str,
        /// The rejected reading
        value: f32,
        /// Minimum plausible value
        min: f32,
        /// Maximum plausible value
        max: f32,
    },

    /// Driver failed to produce a reading at all
    #[error("Sensor unavailable: {reason}")]
    SensorUnavailable {
        /// Short description of the driver failure
        reason: &'static str,
    },
}

/// Failures of the sunrise/sunset lookup
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstroError {
    /// The sun never rises on this date (polar night)
    #[error("No sunrise on this date (polar night)")]
    NoSunrise,

    /// The sun never sets on this date (polar day)
    #[error("No sunset on this date (polar day)")]
    NoSunset,

    /// Date arithmetic left the representable range
    #[error("Date outside the supported range")]
    InvalidDate,
}
