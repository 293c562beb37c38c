//! Session min/max of the corrected temperature
//!
//! Tracking starts only once the warm-up has elapsed (30 s by default), so the
//! first readings of a cold-started sensor do not pin the range. From then on
//! the range can only widen.

use crate::{constants::DEFAULT_WARMUP_MS, time::Timestamp};

/// Lowest and highest corrected temperature seen since warm-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    started_at: Timestamp,
    warmup_ms: u64,
    bounds: Option<(f32, f32)>,
}

impl TemperatureRange {
    /// Start a range for a process started at `started_at`
    pub fn new(started_at: Timestamp, warmup_ms: u64) -> Self {
        Self {
            started_at,
            warmup_ms,
            bounds: None,
        }
    }

    /// True once strictly more than the warm-up has elapsed at `now`
    pub fn is_warm(&self, now: Timestamp) -> bool {
        now.saturating_sub(self.started_at) > self.warmup_ms
    }

    /// Feed a corrected temperature, returning whether the range changed
    pub fn update(&mut self, now: Timestamp, temperature: f32) -> bool {
        if !self.is_warm(now) || !temperature.is_finite() {
            return false;
        }

        let widened = match self.bounds {
            None => (temperature, temperature),
            Some((min, max)) if temperature < min => (temperature, max),
            Some((min, max)) if temperature > max => (min, temperature),
            Some(_) => return false,
        };

        log_debug!("Temperature range now {:.1}..{:.1}", widened.0, widened.1);
        self.bounds = Some(widened);
        true
    }

    /// Lowest temperature, `None` before warm-up
    pub fn min(&self) -> Option<f32> {
        self.bounds.map(|(min, _)| min)
    }

    /// Highest temperature, `None` before warm-up
    pub fn max(&self) -> Option<f32> {
        self.bounds.map(|(_, max)| max)
    }

    /// Both bounds at once
    pub fn bounds(&self) -> Option<(f32, f32)> {
        self.bounds
    }
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self::new(0, DEFAULT_WARMUP_MS)
    }
}
