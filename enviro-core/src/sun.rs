//! Day/Night Cycle Progress
//!
//! ## Overview
//!
//! The display shows how far the current astronomical period (day or night)
//! has progressed. Given the sunset of yesterday, sunrise and sunset of today,
//! and the sunrise of tomorrow, `now` falls into exactly one period:
//!
//! ```text
//!   sunset(y)        sunrise(t)                sunset(t)        sunrise(t+1)
//!      │───── night ─────│─────────── day ──────────│───── night ─────│
//!      │  case 3         │  case 1                  │  case 2         │
//! ```
//!
//! 1. `sunrise_today < now < sunset_today` → day
//! 2. `now >= sunset_today` → night towards tomorrow's sunrise
//! 3. otherwise (`now <= sunrise_today`) → night since yesterday's sunset
//!
//! This assumes one sunrise and one sunset per calendar day, which the
//! [`SunEventSource`](crate::traits::SunEventSource) enforces by reporting
//! polar day and polar night as errors.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::{errors::AstroError, traits::SunEventSource};

/// Sunrise and sunset for a single calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayEvents {
    /// Sunrise instant
    pub sunrise: DateTime<FixedOffset>,
    /// Sunset instant
    pub sunset: DateTime<FixedOffset>,
}

/// The four events bounding yesterday night, today and tonight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunEvents {
    /// Sunset of the previous calendar day
    pub sunset_yesterday: DateTime<FixedOffset>,
    /// Sunrise of the current calendar day
    pub sunrise_today: DateTime<FixedOffset>,
    /// Sunset of the current calendar day
    pub sunset_today: DateTime<FixedOffset>,
    /// Sunrise of the next calendar day
    pub sunrise_tomorrow: DateTime<FixedOffset>,
}

impl SunEvents {
    /// Ask `source` for yesterday, today and tomorrow around `today`
    pub fn lookup<S: SunEventSource + ?Sized>(source: &S, today: NaiveDate) -> Result<Self, AstroError> {
        let yesterday = today.pred_opt().ok_or(AstroError::InvalidDate)?;
        let tomorrow = today.succ_opt().ok_or(AstroError::InvalidDate)?;

        let before = source.events_on(yesterday)?;
        let current = source.events_on(today)?;
        let after = source.events_on(tomorrow)?;

        Ok(Self {
            sunset_yesterday: before.sunset,
            sunrise_today: current.sunrise,
            sunset_today: current.sunset,
            sunrise_tomorrow: after.sunrise,
        })
    }
}

/// Progress through the current day or night
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunCycleState {
    /// Seconds since the period started
    pub progress_secs: f64,
    /// Length of the period in seconds
    pub period_secs: f64,
    /// True between sunrise and sunset
    pub is_day: bool,
    /// Local wall-clock time the state was computed for
    pub local_time: DateTime<FixedOffset>,
}

impl SunCycleState {
    /// Progress as a fraction of the period, clamped to `[0, 1]`
    pub fn fraction(&self) -> f64 {
        if self.period_secs <= 0.0 {
            return 0.0;
        }
        (self.progress_secs / self.period_secs).clamp(0.0, 1.0)
    }
}

fn seconds_between(from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

/// Locate `now` within the day/night periods bounded by `events`
pub fn cycle_state(now: DateTime<FixedOffset>, events: &SunEvents) -> SunCycleState {
    let (start, end, is_day) = if events.sunrise_today < now && now < events.sunset_today {
        (events.sunrise_today, events.sunset_today, true)
    } else if now >= events.sunset_today {
        (events.sunset_today, events.sunrise_tomorrow, false)
    } else {
        (events.sunset_yesterday, events.sunrise_today, false)
    };

    SunCycleState {
        progress_secs: seconds_between(start, now),
        period_secs: seconds_between(start, end),
        is_day,
        local_time: now,
    }
}
