//! Raw Sensor Samples and the Sample Guard
//!
//! ## Overview
//!
//! A [`SensorSample`] is captured once per tick from the external sensor
//! collaborator and is immutable afterwards. Before the engine touches any of
//! its state, the sample passes through a [`SampleGuard`], which rejects
//! values no working sensor could have produced.
//!
//! ## Validation Layers
//!
//! ### 1. Finiteness
//! NaN and infinity are driver glitches (torn I2C reads, uncompensated raw
//! registers). They are rejected before anything else.
//!
//! ### 2. Range
//! Each channel has a plausible physical range:
//!
//! ```text
//! Channel       Min        Max          Source
//! ------------------------------------------------------
//! temperature   -40 °C     85 °C        BME280 operating range
//! humidity      0 %        100 %        definition of RH
//! pressure      300 hPa    1100 hPa     BME280 measuring range
//! light         0 lux      100 000 lux  direct sunlight
//! ```
//!
//! A rejected sample means the tick is skipped: no correction history update,
//! no trend window insertion, no min/max update, no upload decision.

use crate::{
    constants::sensors::*,
    errors::{SampleError, SampleResult},
    time::Timestamp,
};

/// One reading from the sensor collaborator, before timestamping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawReading {
    /// Temperature (°C) as reported by the BME sensor, still self-heated
    pub temperature: f32,
    /// Relative humidity (%) as reported by the BME sensor
    pub humidity: f32,
    /// Barometric pressure (hPa)
    pub pressure: f32,
    /// Ambient light (lux)
    pub light: f32,
}

/// Timestamped raw sample, produced once per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    /// Capture time in milliseconds
    pub timestamp: Timestamp,
    /// Raw BME temperature (°C)
    pub raw_temperature: f32,
    /// Raw relative humidity (%)
    pub raw_humidity: f32,
    /// Raw pressure (hPa)
    pub raw_pressure: f32,
    /// Raw illuminance (lux)
    pub raw_light: f32,
}

impl SensorSample {
    /// Build a sample from individual channel values
    pub fn new(
        timestamp: Timestamp,
        temperature: f32,
        humidity: f32,
        pressure: f32,
        light: f32,
    ) -> Self {
        Self {
            timestamp,
            raw_temperature: temperature,
            raw_humidity: humidity,
            raw_pressure: pressure,
            raw_light: light,
        }
    }

    /// Stamp a driver reading with its capture time
    pub fn stamp(reading: RawReading, timestamp: Timestamp) -> Self {
        Self::new(
            timestamp,
            reading.temperature,
            reading.humidity,
            reading.pressure,
            reading.light,
        )
    }
}

/// Plausible range for a single channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelLimits {
    /// Minimum plausible value (inclusive)
    pub min: f32,
    /// Maximum plausible value (inclusive)
    pub max: f32,
}

impl ChannelLimits {
    /// Create limits, swapping the bounds if given in the wrong order
    pub fn new(min: f32, max: f32) -> Self {
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        Self { min, max }
    }

    /// Check a value against these limits
    pub fn check(&self, channel: &'static str, value: f32) -> SampleResult<()> {
        if !value.is_finite() {
            return Err(SampleError::InvalidValue { channel });
        }

        if value < self.min || value > self.max {
            return Err(SampleError::OutOfRange {
                channel,
                value,
                min: self.min,
                max: self.max,
            });
        }

        Ok(())
    }
}

/// Rejects garbage samples at the tick boundary
#[derive(Debug, Clone)]
pub struct SampleGuard {
    /// Temperature limits (°C)
    pub temperature: ChannelLimits,
    /// Humidity limits (%)
    pub humidity: ChannelLimits,
    /// Pressure limits (hPa)
    pub pressure: ChannelLimits,
    /// Light limits (lux)
    pub light: ChannelLimits,
}

impl Default for SampleGuard {
    fn default() -> Self {
        Self {
            temperature: ChannelLimits::new(TEMP_SENSOR_MIN_C, TEMP_SENSOR_MAX_C),
            humidity: ChannelLimits::new(HUMIDITY_SENSOR_MIN_PCT, HUMIDITY_SENSOR_MAX_PCT),
            pressure: ChannelLimits::new(PRESSURE_SENSOR_MIN_HPA, PRESSURE_SENSOR_MAX_HPA),
            light: ChannelLimits::new(LIGHT_SENSOR_MIN_LUX, LIGHT_SENSOR_MAX_LUX),
        }
    }
}

impl SampleGuard {
    /// Check every channel, reporting the first failure
    pub fn check(&self, sample: &SensorSample) -> SampleResult<()> {
        self.temperature
            .check("temperature", sample.raw_temperature)?;
        self.humidity.check("humidity", sample.raw_humidity)?;
        self.pressure.check("pressure", sample.raw_pressure)?;
        self.light.check("light", sample.raw_light)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(temperature: f32, humidity: f32, pressure: f32, light: f32) -> SensorSample {
        SensorSample::new(1000, temperature, humidity, pressure, light)
    }

    #[test]
    fn accepts_indoor_sample() {
        let guard = SampleGuard::default();
        assert!(guard.check(&sample(22.5, 48.0, 1013.25, 250.0)).is_ok());
    }

    #[test]
    fn rejects_non_finite() {
        let guard = SampleGuard::default();

        let result = guard.check(&sample(f32::NAN, 48.0, 1013.0, 250.0));
        assert_eq!(
            result,
            Err(SampleError::InvalidValue {
                channel: "temperature"
            })
        );

        let result = guard.check(&sample(22.0, 48.0, f32::INFINITY, 250.0));
        assert!(matches!(
            result,
            Err(SampleError::InvalidValue {
                channel: "pressure"
            })
        ));
    }

    #[test]
    fn rejects_out_of_range() {
        let guard = SampleGuard::default();

        // Uncompensated BME register dump reads as ~0 hPa
        let result = guard.check(&sample(22.0, 48.0, 0.0, 250.0));
        assert!(matches!(
            result,
            Err(SampleError::OutOfRange {
                channel: "pressure",
                ..
            })
        ));

        // Humidity can't exceed saturation
        assert!(guard.check(&sample(22.0, 104.0, 1013.0, 250.0)).is_err());

        // Negative lux
        assert!(guard.check(&sample(22.0, 48.0, 1013.0, -1.0)).is_err());
    }

    #[test]
    fn bounds_are_inclusive() {
        let guard = SampleGuard::default();
        assert!(guard.check(&sample(-40.0, 0.0, 300.0, 0.0)).is_ok());
        assert!(guard.check(&sample(85.0, 100.0, 1100.0, 100_000.0)).is_ok());
    }

    #[test]
    fn limits_swap_reversed_bounds() {
        let limits = ChannelLimits::new(10.0, -10.0);
        assert_eq!(limits.min, -10.0);
        assert_eq!(limits.max, 10.0);
    }

    #[test]
    fn stamp_copies_channels() {
        let reading = RawReading {
            temperature: 21.0,
            humidity: 50.0,
            pressure: 1001.0,
            light: 12.0,
        };
        let sample = SensorSample::stamp(reading, 42);
        assert_eq!(sample.timestamp, 42);
        assert_eq!(sample.raw_pressure, 1001.0);
        assert_eq!(sample.raw_light, 12.0);
    }
}
