//! Common test utilities for the engine integration tests
//!
//! - Deterministic sample generators (diurnal temperature, pressure fronts,
//!   driver glitches)
//! - Tick input builders at a fixed UTC offset

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, TimeZone};

use enviro_core::{time::Timestamp, SensorSample, SunEvents, TickInput};

pub mod generators;

/// 2024-06-10 00:00:00 UTC
pub const START_MS: Timestamp = 1_717_977_600_000;

/// Local wall-clock time at UTC+1 for a timestamp
pub fn local(timestamp: Timestamp) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(3600)
        .unwrap()
        .timestamp_millis_opt(timestamp as i64)
        .unwrap()
}

/// Build a tick input with no sun events
pub fn tick_input(sample: SensorSample, cpu_temperature: Option<f32>) -> TickInput {
    TickInput {
        sample,
        cpu_temperature,
        local_time: local(sample.timestamp),
        sun_events: None,
    }
}

/// Sun events with sunrise 06:00 and sunset 20:00 local, yesterday to tomorrow
pub fn summer_events() -> SunEvents {
    let offset = FixedOffset::east_opt(3600).unwrap();
    SunEvents {
        sunset_yesterday: offset.with_ymd_and_hms(2024, 6, 9, 19, 55, 0).unwrap(),
        sunrise_today: offset.with_ymd_and_hms(2024, 6, 10, 6, 0, 0).unwrap(),
        sunset_today: offset.with_ymd_and_hms(2024, 6, 10, 20, 0, 0).unwrap(),
        sunrise_tomorrow: offset.with_ymd_and_hms(2024, 6, 11, 6, 5, 0).unwrap(),
    }
}
