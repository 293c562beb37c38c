//! Render frame description
//!
//! A [`Frame`] carries everything the display needs for one refresh, already
//! formatted, so renderers only place text and icons. Text lives in
//! fixed-capacity `heapless` strings; a value too wide for its field is
//! truncated rather than allocating.
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ 14:05                       21 Jun 24 │
//! │ [temp]   21.4°C   [bulb]       1,234 │
//! │          18-24                 BRIGHT │
//! │ [hum]       48%   [weather] 1,013 >   │
//! │            GOOD                  FAIR │
//! └──────────────────────────────────────┘
//! ```
//!
//! Each channel's icon comes from its own label, so humidity and light icons
//! are placed independently.

use core::fmt::Write;

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use heapless::String;

use crate::{
    classify::{HumidityLabel, LightLabel, PressureLabel},
    correction::CorrectedReading,
    range::TemperatureRange,
    sun::SunCycleState,
    trend::{Trend, TrendResult},
};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Short text field
pub type Field = String<16>;

/// One display refresh
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// `HH:MM`
    pub time: Field,
    /// `D Mon YY`, no leading zero on the day
    pub date: Field,
    /// Corrected temperature, `21.4°C`
    pub temperature: Field,
    /// Session range `18-24`, or ` - ` before warm-up
    pub range: Field,
    /// Corrected humidity, `48%`
    pub humidity: Field,
    /// Humidity descriptor
    pub humidity_label: HumidityLabel,
    /// Light with thousands separators, `1,234`
    pub light: Field,
    /// Light descriptor
    pub light_label: LightLabel,
    /// Mean pressure and trend symbol, `1,013 >`
    pub pressure: Field,
    /// Pressure descriptor, from the mean pressure
    pub pressure_label: PressureLabel,
    /// Trend shown next to the pressure
    pub trend: Trend,
    /// Day/night progress, `None` when the sun lookup failed
    pub sun: Option<SunCycleState>,
}

/// Append `value` with `,` every three digits
pub fn write_grouped<const N: usize>(out: &mut String<N>, value: i64) -> core::fmt::Result {
    if value < 0 {
        out.write_char('-')?;
    }

    let mut digits = [0u8; 20];
    let mut len = 0;
    let mut rest = value.unsigned_abs();
    loop {
        digits[len] = b'0' + (rest % 10) as u8;
        len += 1;
        rest /= 10;
        if rest == 0 {
            break;
        }
    }

    for (written, idx) in (0..len).rev().enumerate() {
        if written > 0 && (len - written) % 3 == 0 {
            out.write_char(',')?;
        }
        out.write_char(digits[idx] as char)?;
    }
    Ok(())
}

impl Frame {
    /// Format one frame from this tick's results
    pub fn build(
        local_time: DateTime<FixedOffset>,
        corrected: &CorrectedReading,
        range: &TemperatureRange,
        light: f32,
        trend: &TrendResult,
        sun: Option<SunCycleState>,
    ) -> Self {
        let mut frame = Self {
            time: Field::new(),
            date: Field::new(),
            temperature: Field::new(),
            range: Field::new(),
            humidity: Field::new(),
            humidity_label: HumidityLabel::from_percent(corrected.humidity),
            light: Field::new(),
            light_label: LightLabel::from_lux(light),
            pressure: Field::new(),
            pressure_label: PressureLabel::from_hpa(trend.mean_pressure),
            trend: trend.trend,
            sun,
        };

        // Overflow only truncates a field
        let _ = write!(frame.time, "{:02}:{:02}", local_time.hour(), local_time.minute());
        let _ = write!(
            frame.date,
            "{} {} {:02}",
            local_time.day(),
            MONTHS[local_time.month0() as usize],
            local_time.year().rem_euclid(100)
        );
        let _ = write!(frame.temperature, "{:.1}°C", corrected.temperature);
        let _ = match range.bounds() {
            Some((min, max)) => write!(frame.range, "{:.0}-{:.0}", min, max),
            None => frame.range.write_str(" - "),
        };
        let _ = write!(frame.humidity, "{:.0}%", corrected.humidity);
        let _ = write_grouped(&mut frame.light, light as i64);
        let _ = write_grouped(&mut frame.pressure, trend.mean_pressure as i64)
            .and_then(|_| write!(frame.pressure, " {}", trend.trend));

        frame
    }

    /// Progress through the current day or night, 0 without sun data
    pub fn sun_fraction(&self) -> f64 {
        self.sun.map(|s| s.fraction()).unwrap_or(0.0)
    }
}
