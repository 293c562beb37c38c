//! The per-tick pipeline
//!
//! [`Engine`] owns every piece of state that survives a tick:
//!
//! | State                 | Owner                  | Lifetime          |
//! |-----------------------|------------------------|-------------------|
//! | CPU temperature (×5)  | [`CorrectionModel`]    | process           |
//! | Pressure window (×N)  | [`TrendAnalyzer`]      | process           |
//! | Min/max temperature   | [`TemperatureRange`]   | process           |
//! | Upload schedule       | [`UploadScheduler`]    | process           |
//!
//! The sampling loop gathers collaborator results into a [`TickInput`] and
//! calls [`Engine::tick`]. Each tick runs in a fixed order:
//!
//! ```text
//! guard → correct → range → trend → sun cycle → frame → upload decision
//! ```
//!
//! A sample rejected by the guard returns early with a [`SampleError`] and
//! leaves all state untouched.

use chrono::{DateTime, FixedOffset};

use crate::{
    constants::DEFAULT_WARMUP_MS,
    correction::{CorrectedReading, CorrectionConfig, CorrectionModel},
    errors::SampleResult,
    frame::Frame,
    range::TemperatureRange,
    sample::{SampleGuard, SensorSample},
    sun::{cycle_state, SunEvents},
    time::{unix_seconds, Timestamp},
    trend::{TrendAnalyzer, TrendResult},
    upload::{
        SchedulerConfig, SendOutcome, TelemetryPayload, UploadDecision, UploadScheduler, UploadStats,
    },
};

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Self-heating calibration
    pub correction: CorrectionConfig,
    /// Upload interval policy
    pub scheduler: SchedulerConfig,
    /// Delay before the min/max range starts tracking (ms)
    pub warmup_ms: u64,
    /// Plausibility limits for raw samples
    pub guard: SampleGuard,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            correction: CorrectionConfig::default(),
            scheduler: SchedulerConfig::default(),
            warmup_ms: DEFAULT_WARMUP_MS,
            guard: SampleGuard::default(),
        }
    }
}

impl EngineConfig {
    /// Set the self-heating calibration
    pub fn with_correction(mut self, correction: CorrectionConfig) -> Self {
        self.correction = correction;
        self
    }

    /// Set the upload policy
    pub fn with_scheduler(mut self, scheduler: SchedulerConfig) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Set the min/max warm-up in milliseconds
    pub fn with_warmup_ms(mut self, warmup_ms: u64) -> Self {
        self.warmup_ms = warmup_ms;
        self
    }
}

/// Everything the loop collected for one tick
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Raw sensor sample
    pub sample: SensorSample,
    /// CPU temperature, `None` if the source failed
    pub cpu_temperature: Option<f32>,
    /// Local wall-clock time of the sample
    pub local_time: DateTime<FixedOffset>,
    /// Sun events around today, `None` if the lookup failed
    pub sun_events: Option<SunEvents>,
}

/// Results of one tick
#[derive(Debug, Clone)]
pub struct TickOutput {
    /// Corrected temperature and humidity
    pub corrected: CorrectedReading,
    /// Trend analysis of the pressure window
    pub trend: TrendResult,
    /// Frame for the renderer
    pub frame: Frame,
    /// Upload decision for this tick
    pub upload: UploadDecision,
    /// Payload to send, present exactly when `upload` is `Send`
    pub payload: Option<TelemetryPayload>,
}

/// Stateful acquisition, correction and trend engine
#[derive(Debug, Clone)]
pub struct Engine {
    guard: SampleGuard,
    correction: CorrectionModel,
    trend: TrendAnalyzer,
    range: TemperatureRange,
    scheduler: UploadScheduler,
    ticks: u64,
    skipped: u64,
}

impl Engine {
    /// Create an engine for a process started at `started_at`
    pub fn new(config: EngineConfig, started_at: Timestamp) -> Self {
        Self {
            guard: config.guard,
            correction: CorrectionModel::new(config.correction),
            trend: TrendAnalyzer::new(),
            range: TemperatureRange::new(started_at, config.warmup_ms),
            scheduler: UploadScheduler::new(config.scheduler),
            ticks: 0,
            skipped: 0,
        }
    }

    /// Run one tick
    pub fn tick(&mut self, input: &TickInput) -> SampleResult<TickOutput> {
        let sample = &input.sample;

        if let Err(e) = self.guard.check(sample) {
            self.skipped += 1;
            log_warn!("Skipping tick at {}: {}", sample.timestamp, e);
            return Err(e);
        }

        let corrected = self.correction.correct(
            sample.raw_temperature,
            sample.raw_humidity,
            input.cpu_temperature,
        );
        self.range.update(sample.timestamp, corrected.temperature);

        let trend = self.trend.analyze(sample.timestamp, sample.raw_pressure);
        let sun = input
            .sun_events
            .map(|events| cycle_state(input.local_time, &events));

        let frame = Frame::build(
            input.local_time,
            &corrected,
            &self.range,
            sample.raw_light,
            &trend,
            sun,
        );

        let upload = self.scheduler.poll(sample.timestamp);
        let payload = match upload {
            UploadDecision::Send => Some(TelemetryPayload::new(
                unix_seconds(sample.timestamp),
                corrected.temperature,
                corrected.humidity,
                trend.mean_pressure,
                sample.raw_light,
            )),
            UploadDecision::Wait | UploadDecision::Discard => None,
        };

        self.ticks += 1;

        Ok(TickOutput {
            corrected,
            trend,
            frame,
            upload,
            payload,
        })
    }

    /// Report what happened to the last payload
    pub fn record_upload(&mut self, outcome: SendOutcome) {
        self.scheduler.record_outcome(outcome);
    }

    /// Self-heating correction state
    pub fn correction(&self) -> &CorrectionModel {
        &self.correction
    }

    /// Pressure trend state
    pub fn trend(&self) -> &TrendAnalyzer {
        &self.trend
    }

    /// Session temperature range
    pub fn range(&self) -> &TemperatureRange {
        &self.range
    }

    /// Upload schedule
    pub fn scheduler(&self) -> &UploadScheduler {
        &self.scheduler
    }

    /// Upload counters
    pub fn upload_stats(&self) -> UploadStats {
        self.scheduler.stats()
    }

    /// Accepted ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks rejected by the sample guard
    pub fn skipped_ticks(&self) -> u64 {
        self.skipped
    }
}
