//! Self-Heating and Humidity Correction
//!
//! ## Physics Background
//!
//! On a Raspberry Pi HAT the BME280 sits a few millimetres above the SoC. The
//! CPU heats the board, so the sensor reads warmer than the room. The warmer
//! the CPU is relative to the sensor, the larger the error:
//!
//! ```text
//! corrected = raw - (avg_cpu - raw) / factor + offset
//! ```
//!
//! - `avg_cpu` is the mean of the last five CPU temperatures, which smooths the
//!   spikes a busy CPU produces between ticks
//! - `factor` dampens the correction (2 suits a Pi Zero in an open case)
//! - `offset` is a static calibration against a reference thermometer
//!
//! ### Humidity
//!
//! Relative humidity is measured at the (heated) sensor, so it reads dry.
//! It is re-derived through an approximate dewpoint:
//!
//! ```text
//! dewpoint  = corrected_temperature - (100 - raw_humidity) / 5
//! corrected = 100 - 3.5 * (corrected_temperature - dewpoint)
//! ```
//!
//! clamped to [0, 100]. The depression `corrected_temperature - dewpoint` only
//! depends on the raw humidity, which is what the empirical constants were
//! fitted against.
//!
//! ## Guarding the CPU History
//!
//! A non-finite CPU temperature (a torn sysfs read) is discarded. The history
//! keeps its previous contents and the tick is corrected with the readings
//! already present. With an empty history no correction is applied.

use crate::{
    buffer::CircularBuffer,
    constants::thresholds::{CPU_HISTORY_LEN, DEWPOINT_PCT_PER_DEGREE, HUMIDITY_PER_DEWPOINT_DEGREE},
};

/// Calibration constants for the self-heating correction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionConfig {
    /// Dampening applied to the CPU-to-sensor temperature difference
    pub factor: f32,
    /// Static calibration offset (°C)
    pub offset: f32,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            factor: 2.0,
            offset: 0.0,
        }
    }
}

impl CorrectionConfig {
    /// Set the dampening factor
    pub fn with_factor(mut self, factor: f32) -> Self {
        self.factor = factor;
        self
    }

    /// Set the calibration offset
    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }
}

/// Corrected values for a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectedReading {
    /// Ambient temperature with CPU self-heating removed (°C)
    pub temperature: f32,
    /// Relative humidity re-derived at the corrected temperature (%)
    pub humidity: f32,
}

/// Stateful temperature correction owning the CPU temperature history
#[derive(Debug, Clone)]
pub struct CorrectionModel {
    config: CorrectionConfig,
    cpu_history: CircularBuffer<f32, CPU_HISTORY_LEN>,
}

impl CorrectionModel {
    /// Create a model with an empty CPU history
    pub fn new(config: CorrectionConfig) -> Self {
        Self {
            config,
            cpu_history: CircularBuffer::new(),
        }
    }

    /// Active calibration constants
    pub fn config(&self) -> &CorrectionConfig {
        &self.config
    }

    /// Recent CPU temperatures, oldest first
    pub fn cpu_history(&self) -> impl Iterator<Item = f32> + '_ {
        self.cpu_history.iter().copied()
    }

    /// Number of CPU temperatures currently averaged
    pub fn cpu_history_len(&self) -> usize {
        self.cpu_history.len()
    }

    /// Mean of the CPU history, `None` while empty
    pub fn average_cpu(&self) -> Option<f32> {
        if self.cpu_history.is_empty() {
            return None;
        }
        let sum: f32 = self.cpu_history.iter().sum();
        Some(sum / self.cpu_history.len() as f32)
    }

    /// Record the current CPU temperature and correct the raw reading
    ///
    /// `cpu_temperature` of `None` (source unavailable) or a non-finite value
    /// leaves the history unchanged.
    pub fn correct_temperature(&mut self, raw_temperature: f32, cpu_temperature: Option<f32>) -> f32 {
        match cpu_temperature {
            Some(cpu) if cpu.is_finite() => {
                self.cpu_history.push(cpu);
            }
            Some(cpu) => {
                log_warn!("Discarding non-finite CPU temperature {}", cpu);
            }
            None => {}
        }

        let avg_cpu = self.average_cpu().unwrap_or(raw_temperature);
        raw_temperature - ((avg_cpu - raw_temperature) / self.config.factor) + self.config.offset
    }

    /// Correct both channels for one tick
    pub fn correct(
        &mut self,
        raw_temperature: f32,
        raw_humidity: f32,
        cpu_temperature: Option<f32>,
    ) -> CorrectedReading {
        let temperature = self.correct_temperature(raw_temperature, cpu_temperature);
        let humidity = correct_humidity(raw_humidity, raw_temperature, temperature);
        CorrectedReading {
            temperature,
            humidity,
        }
    }
}

impl Default for CorrectionModel {
    fn default() -> Self {
        Self::new(CorrectionConfig::default())
    }
}

/// Re-derive relative humidity at the corrected temperature
///
/// The raw temperature is part of the contract for sensors whose depression
/// model needs it; the dewpoint approximation used here does not.
pub fn correct_humidity(raw_humidity: f32, _raw_temperature: f32, corrected_temperature: f32) -> f32 {
    let dewpoint = corrected_temperature - ((100.0 - raw_humidity) / DEWPOINT_PCT_PER_DEGREE);
    let corrected = 100.0 - HUMIDITY_PER_DEWPOINT_DEGREE * (corrected_temperature - dewpoint);
    corrected.clamp(0.0, 100.0)
}
