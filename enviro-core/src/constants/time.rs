//! Time-Related Constants
//!
//! All engine timestamps are milliseconds (see [`crate::time::Timestamp`]).

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Seconds per hour.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

// ===== SAMPLING =====

/// Trailing delay after each tick (milliseconds).
///
/// The loop runs as fast as sensor I/O and rendering allow, then sleeps this
/// long, giving a nominal 1 Hz cadence.
pub const DEFAULT_TICK_DELAY_MS: u64 = 1000;

/// Warm-up before the min/max temperature range starts tracking (milliseconds).
///
/// The BME280 reads high for the first seconds after power-up while the CPU
/// correction history fills.
pub const DEFAULT_WARMUP_MS: u64 = 30 * MS_PER_SECOND;

// ===== UPLOADS =====

/// Minimum time between two upload windows (milliseconds).
pub const DEFAULT_UPLOAD_INTERVAL_MS: u64 = 60 * MS_PER_SECOND;

/// Transport timeout for a single upload (seconds).
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 5;
