//! Time management for the sampling loop
//!
//! The engine never reads a clock itself. Every tick is stamped by the caller
//! through a [`TimeSource`], which keeps the pipeline deterministic under test:
//! - [`SystemTime`] for the real station (Unix milliseconds)
//! - [`FixedTime`] for tests, advanced by hand

use chrono::{DateTime, FixedOffset};

use crate::constants::MS_PER_SECOND;

/// Timestamp in milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Source of time for the system
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Start the clock at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to an absolute timestamp
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move the clock forward
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

/// Timestamp as fractional seconds, the unit the trend regression works in
pub fn as_seconds(timestamp: Timestamp) -> f64 {
    timestamp as f64 / MS_PER_SECOND as f64
}

/// Whole Unix seconds, as sent to the collector
pub fn unix_seconds(timestamp: Timestamp) -> i64 {
    (timestamp / MS_PER_SECOND) as i64
}

/// Local wall-clock time for a timestamp at a fixed UTC offset
///
/// Returns `None` only for timestamps beyond chrono's range.
pub fn local_time(timestamp: Timestamp, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let secs = unix_seconds(timestamp);
    let nanos = ((timestamp % MS_PER_SECOND) * 1_000_000) as u32;
    DateTime::from_timestamp(secs, nanos).map(|utc| utc.with_timezone(&offset))
}
