//! Sunrise and Sunset from Latitude and Longitude
//!
//! ## Overview
//!
//! [`SolarCalculator`] implements [`SunEventSource`] with the sunrise
//! equation, so the station needs no ephemeris tables and no network lookup.
//! Accuracy is within a minute or two at mid latitudes, far below what a
//! progress indicator can show.
//!
//! ### Algorithm
//!
//! ```text
//! n          = days since 2000-01-01 (J2000)
//! J*         = n - longitude / 360                   mean solar noon
//! M          = 357.5291 + 0.98560028 J*  (mod 360)   mean anomaly
//! C          = 1.9148 sin M + 0.02 sin 2M + 0.0003 sin 3M
//! λ          = M + C + 282.9372          (mod 360)   ecliptic longitude
//! J_transit  = 2451545 + J* + 0.0053 sin M - 0.0069 sin 2λ
//! sin δ      = sin λ · sin 23.4397°
//! cos ω0     = (sin -0.833° - sin φ sin δ) / (cos φ cos δ)
//! rise, set  = J_transit ∓ ω0 / 360
//! ```
//!
//! `-0.833°` accounts for refraction and the solar disc radius. When
//! `|cos ω0| > 1` the sun stays above (polar day) or below (polar night) the
//! horizon all day and an [`AstroError`] is returned.
//!
//! The calculator works with a fixed UTC offset; daylight-saving changes are
//! not tracked.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};

use crate::{errors::AstroError, sun::DayEvents, traits::SunEventSource};

/// Julian date of the Unix epoch
const JULIAN_UNIX_EPOCH: f64 = 2_440_587.5;

/// Julian date of J2000.0 (2000-01-01 12:00 TT)
const JULIAN_2000: f64 = 2_451_545.0;

/// `num_days_from_ce()` of 1970-01-01
const DAYS_CE_TO_UNIX_EPOCH: i32 = 719_163;

/// Unix days from 1970-01-01 to 2000-01-01
const DAYS_UNIX_TO_J2000: i32 = 10_957;

/// Sun altitude at apparent sunrise/sunset (degrees)
const SUNRISE_ALTITUDE_DEG: f64 = -0.833;

/// Obliquity of the ecliptic (degrees)
const EARTH_OBLIQUITY_DEG: f64 = 23.4397;

const SECONDS_PER_DAY: f64 = 86_400.0;

fn sin_deg(degrees: f64) -> f64 {
    libm::sin(degrees.to_radians())
}

fn cos_deg(degrees: f64) -> f64 {
    libm::cos(degrees.to_radians())
}

fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = libm::fmod(degrees, 360.0);
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Sunrise/sunset source for a fixed location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarCalculator {
    latitude: f64,
    longitude: f64,
    offset: FixedOffset,
}

impl SolarCalculator {
    /// Location in degrees (north and east positive) with its UTC offset
    pub fn new(latitude: f64, longitude: f64, offset: FixedOffset) -> Self {
        Self {
            latitude,
            longitude,
            offset,
        }
    }

    /// Latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Offset applied to the returned events
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Julian dates of sunrise and sunset on `date`
    fn julian_events(&self, date: NaiveDate) -> Result<(f64, f64), AstroError> {
        let unix_days = date.num_days_from_ce() - DAYS_CE_TO_UNIX_EPOCH;
        let n = (unix_days - DAYS_UNIX_TO_J2000) as f64;

        let mean_noon = n - self.longitude / 360.0;
        let anomaly = normalize_degrees(357.5291 + 0.985_600_28 * mean_noon);
        let center = 1.9148 * sin_deg(anomaly)
            + 0.0200 * sin_deg(2.0 * anomaly)
            + 0.0003 * sin_deg(3.0 * anomaly);
        let ecliptic = normalize_degrees(anomaly + center + 282.9372);

        let transit =
            JULIAN_2000 + mean_noon + 0.0053 * sin_deg(anomaly) - 0.0069 * sin_deg(2.0 * ecliptic);

        let sin_declination = sin_deg(ecliptic) * sin_deg(EARTH_OBLIQUITY_DEG);
        let cos_declination = libm::cos(libm::asin(sin_declination));

        let cos_hour_angle = (sin_deg(SUNRISE_ALTITUDE_DEG)
            - sin_deg(self.latitude) * sin_declination)
            / (cos_deg(self.latitude) * cos_declination);

        if !cos_hour_angle.is_finite() {
            return Err(AstroError::InvalidDate);
        }
        if cos_hour_angle < -1.0 {
            return Err(AstroError::NoSunset);
        }
        if cos_hour_angle > 1.0 {
            return Err(AstroError::NoSunrise);
        }

        let hour_angle = libm::acos(cos_hour_angle).to_degrees();
        Ok((transit - hour_angle / 360.0, transit + hour_angle / 360.0))
    }

    fn to_local(&self, julian: f64) -> Result<DateTime<FixedOffset>, AstroError> {
        let unix = (julian - JULIAN_UNIX_EPOCH) * SECONDS_PER_DAY;
        let secs = libm::floor(unix);
        let nanos = ((unix - secs) * 1e9) as u32;

        DateTime::from_timestamp(secs as i64, nanos)
            .map(|utc| utc.with_timezone(&self.offset))
            .ok_or(AstroError::InvalidDate)
    }
}

impl SunEventSource for SolarCalculator {
    fn events_on(&self, date: NaiveDate) -> Result<DayEvents, AstroError> {
        let (rise, set) = self.julian_events(date)?;
        Ok(DayEvents {
            sunrise: self.to_local(rise)?,
            sunset: self.to_local(set)?,
        })
    }
}
