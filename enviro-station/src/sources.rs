//! Reading sources for the station loop
//!
//! - [`ThermalZone`] reads the SoC temperature from a Linux thermal zone
//!   file, the same file Raspberry Pi OS exposes
//! - [`SimulatedSensor`] stands in for the BME280 and light sensor on
//!   machines without the hardware

use std::fs;
use std::path::{Path, PathBuf};

use enviro_core::{
    time::{SystemTime, TimeSource},
    CpuTemperatureSource, RawReading, SampleError, SampleResult, SensorSource,
};

/// CPU temperature from a sysfs thermal zone (millidegrees Celsius)
#[derive(Debug, Clone)]
pub struct ThermalZone {
    path: PathBuf,
}

impl ThermalZone {
    /// Read from `path`, typically `/sys/class/thermal/thermal_zone0/temp`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File this zone reads
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_millidegrees(text: &str) -> SampleResult<f32> {
    let millis: f32 = text.trim().parse().map_err(|_| SampleError::SensorUnavailable {
        reason: "unparseable thermal zone value",
    })?;
    Ok(millis / 1000.0)
}

impl CpuTemperatureSource for ThermalZone {
    fn read(&mut self) -> SampleResult<f32> {
        let text = fs::read_to_string(&self.path).map_err(|_| SampleError::SensorUnavailable {
            reason: "thermal zone unreadable",
        })?;
        parse_millidegrees(&text)
    }
}

/// Synthetic BME280 + LTR559 readings
///
/// ```text
/// temperature  diurnal sine around 15 °C, peak mid-afternoon, + self-heating
/// humidity     inverse of the temperature swing
/// pressure     slow random walk around 1013 hPa
/// light        half-sine between 06:00 and 20:00 UTC, dark otherwise
/// ```
///
/// Each channel carries a little noise from a seeded generator so runs
/// are reproducible.
#[derive(Debug, Clone)]
pub struct SimulatedSensor<C: TimeSource = SystemTime> {
    clock: C,
    state: u64,
    pressure: f32,
    self_heating: f32,
}

impl SimulatedSensor<SystemTime> {
    /// Simulate against the system clock
    pub fn new(seed: u64) -> Self {
        Self::with_clock(SystemTime, seed)
    }
}

impl<C: TimeSource> SimulatedSensor<C> {
    /// Simulate against an arbitrary clock
    pub fn with_clock(clock: C, seed: u64) -> Self {
        Self {
            clock,
            state: seed,
            pressure: 1013.0,
            self_heating: 4.0,
        }
    }

    /// Uniform noise in `[-amplitude, amplitude]`
    fn noise(&mut self, amplitude: f32) -> f32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let unit = (self.state >> 40) as f32 / (1u64 << 24) as f32;
        (unit * 2.0 - 1.0) * amplitude
    }

    /// Hours since UTC midnight for the clock's current time
    fn hour_of_day(&self) -> f32 {
        let secs_of_day = (self.clock.now() / 1000) % 86_400;
        secs_of_day as f32 / 3600.0
    }
}

impl<C: TimeSource> SensorSource for SimulatedSensor<C> {
    fn read(&mut self) -> SampleResult<RawReading> {
        let hour = self.hour_of_day();
        let phase = (hour - 9.0) / 24.0 * core::f32::consts::TAU;
        let swing = phase.sin();

        let temperature = 15.0 + 6.0 * swing + self.self_heating + self.noise(0.1);
        let humidity = (60.0 - 15.0 * swing + self.noise(1.0)).clamp(0.0, 100.0);

        self.pressure = (self.pressure + self.noise(0.02)).clamp(950.0, 1050.0);

        let light = if (6.0..20.0).contains(&hour) {
            let day = (hour - 6.0) / 14.0 * core::f32::consts::PI;
            (20_000.0 * day.sin() + self.noise(50.0)).max(0.0)
        } else {
            0.0
        };

        Ok(RawReading {
            temperature,
            humidity,
            pressure: self.pressure,
            light,
        })
    }
}
