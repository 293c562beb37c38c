//! Deterministic sensor series for integration tests
//!
//! Physics kept deliberately simple:
//! - temperature follows a 24 h sine around a base value
//! - humidity moves against temperature (~2 % per °C)
//! - pressure follows a linear front plus bounded noise
//! - the CPU runs a fixed amount above the sensor

use enviro_core::{time::Timestamp, SensorSample};

/// Sample generator with a linear congruential noise source
pub struct StationGenerator {
    seed: u32,
    start: Timestamp,
    time: Timestamp,
    interval_ms: u64,
}

impl StationGenerator {
    /// Start at `start` with one sample every `interval_ms`
    pub fn new(start: Timestamp, interval_ms: u64) -> Self {
        Self {
            seed: 0x1234_5678,
            start,
            time: start,
            interval_ms,
        }
    }

    /// Current generator time
    pub fn now(&self) -> Timestamp {
        self.time
    }

    /// Uniform noise in `[-amplitude, amplitude]`
    pub fn noise(&mut self, amplitude: f32) -> f32 {
        self.seed = self.seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let uniform = (self.seed >> 8) as f32 / 16_777_216.0;
        (uniform - 0.5) * 2.0 * amplitude
    }

    /// Next sample of a pressure front moving at `hpa_per_hour`
    pub fn front(&mut self, base_pressure: f32, hpa_per_hour: f32, noise_hpa: f32) -> SensorSample {
        let hours = (self.time % 86_400_000) as f32 / 3_600_000.0;
        let diurnal = 3.0 * libm::sinf(2.0 * core::f32::consts::PI * hours / 24.0);
        let temperature = 28.0 + diurnal + self.noise(0.1);
        let humidity = (55.0 - 2.0 * diurnal + self.noise(0.5)).clamp(0.0, 100.0);

        let elapsed_hours = self.elapsed_hours();
        let pressure = base_pressure + hpa_per_hour * elapsed_hours + self.noise(noise_hpa);
        let light = 300.0 + self.noise(20.0);

        let sample = SensorSample::new(self.time, temperature, humidity, pressure, light);
        self.time += self.interval_ms;
        sample
    }

    /// `count` samples of a pressure front
    pub fn front_series(
        &mut self,
        count: usize,
        base_pressure: f32,
        hpa_per_hour: f32,
        noise_hpa: f32,
    ) -> Vec<SensorSample> {
        (0..count)
            .map(|_| self.front(base_pressure, hpa_per_hour, noise_hpa))
            .collect()
    }

    /// CPU temperature a fixed 20 °C above the sensor, with a little noise
    pub fn cpu_for(&mut self, sample: &SensorSample) -> f32 {
        sample.raw_temperature + 20.0 + self.noise(0.5)
    }

    /// A garbage reading as a torn bus transfer produces
    pub fn glitch(&mut self) -> SensorSample {
        let sample = SensorSample::new(self.time, f32::NAN, 45.0, 0.0, -1.0);
        self.time += self.interval_ms;
        sample
    }

    fn elapsed_hours(&self) -> f32 {
        (self.time - self.start) as f32 / 3_600_000.0
    }
}
