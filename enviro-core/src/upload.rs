//! Upload Scheduling with a Stabilization Skip
//!
//! ## Overview
//!
//! Once per tick the sampling loop asks the [`UploadScheduler`] whether an
//! aggregated reading should go to the collector. The policy is
//! at-most-once-per-interval and best-effort: a failed send is counted, never
//! retried, and the next interval delivers a fresher reading instead.
//!
//! ## State Machine
//!
//! ```text
//!              first due tick
//!  Stabilizing ───────────────► Idle ◄─────────────┐
//!   (discard)                    │                 │ record_outcome
//!                                │ interval due    │
//!                                ▼                 │
//!                             Sending ─────────────┘
//! ```
//!
//! - The very first due tick never transmits: the sensors are still settling,
//!   so that reading is discarded and the interval clock starts.
//! - `last_sent` moves forward on every due tick, whatever the outcome, so a
//!   failed send waits a full interval like a successful one.
//! - No schedule state exists before the first poll, which makes the first
//!   tick due immediately.
//!
//! ## Payload
//!
//! [`TelemetryPayload`] is the wire shape the collector expects. Values are
//! rounded to two decimal places; the field names are fixed by the collector:
//!
//! ```json
//! {"unix": 1718971200, "temp": 21.35, "humidity": 48.2, "pressure": 1013.07, "light": 120.0}
//! ```

use crate::{constants::DEFAULT_UPLOAD_INTERVAL_MS, time::Timestamp};

/// Upload interval and warm-up policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Minimum time between two upload windows (ms)
    pub interval_ms: u64,
    /// Discard the first due window while sensors stabilize
    pub discard_first: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_UPLOAD_INTERVAL_MS,
            discard_first: true,
        }
    }
}

impl SchedulerConfig {
    /// Set the interval in seconds
    pub fn with_interval_secs(mut self, secs: u64) -> Self {
        self.interval_ms = secs.saturating_mul(1000);
        self
    }

    /// Enable or disable the stabilization discard
    pub fn with_discard_first(mut self, discard: bool) -> Self {
        self.discard_first = discard;
        self
    }
}

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    /// Waiting for the first due window, which is discarded
    Stabilizing,
    /// Waiting for the next interval
    Idle,
    /// A payload was handed out and its outcome is pending
    Sending,
}

/// What the sampling loop should do this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadDecision {
    /// Interval not elapsed
    Wait,
    /// First due window, dropped while sensors stabilize
    Discard,
    /// Build a payload from this tick and send it
    Send,
}

/// Result of handing a payload to a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Collector acknowledged the payload
    Delivered,
    /// Payload accepted by a background uploader, outcome reported there
    Queued,
    /// Network or HTTP failure, not retried
    Failed,
}

/// Counters for upload windows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadStats {
    /// Windows dropped during stabilization
    pub discarded: u32,
    /// Windows for which a payload was built
    pub attempted: u32,
    /// Payloads acknowledged by the collector
    pub delivered: u32,
    /// Payloads handed to a background uploader
    pub queued: u32,
    /// Payloads that failed to send
    pub failed: u32,
}

/// One aggregated reading for the collector
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TelemetryPayload {
    /// Unix time in whole seconds
    pub unix: i64,
    /// Corrected temperature (°C)
    #[cfg_attr(feature = "serde", serde(rename = "temp"))]
    pub temperature: f64,
    /// Corrected relative humidity (%)
    pub humidity: f64,
    /// Mean pressure over the trend window (hPa)
    pub pressure: f64,
    /// Ambient light (lux)
    pub light: f64,
}

/// Round to two decimal places
pub fn round2(value: f32) -> f64 {
    libm::round(value as f64 * 100.0) / 100.0
}

impl TelemetryPayload {
    /// Build a payload, rounding every reading to two decimals
    pub fn new(unix: i64, temperature: f32, humidity: f32, pressure: f32, light: f32) -> Self {
        Self {
            unix,
            temperature: round2(temperature),
            humidity: round2(humidity),
            pressure: round2(pressure),
            light: round2(light),
        }
    }
}

/// Decides when a reading is uploaded
#[derive(Debug, Clone)]
pub struct UploadScheduler {
    config: SchedulerConfig,
    state: UploadState,
    first_reading_pending: bool,
    last_sent: Option<Timestamp>,
    stats: UploadStats,
}

impl UploadScheduler {
    /// Create a scheduler in the stabilizing state
    pub fn new(config: SchedulerConfig) -> Self {
        let (state, first_reading_pending) = if config.discard_first {
            (UploadState::Stabilizing, true)
        } else {
            (UploadState::Idle, false)
        };

        Self {
            config,
            state,
            first_reading_pending,
            last_sent: None,
            stats: UploadStats::default(),
        }
    }

    /// Current state
    pub fn state(&self) -> UploadState {
        self.state
    }

    /// True until the stabilization window has been discarded
    pub fn first_reading_pending(&self) -> bool {
        self.first_reading_pending
    }

    /// Time of the last due window, discarded or sent
    pub fn last_sent(&self) -> Option<Timestamp> {
        self.last_sent
    }

    /// Window counters
    pub fn stats(&self) -> UploadStats {
        self.stats
    }

    /// Active configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn is_due(&self, now: Timestamp) -> bool {
        match self.last_sent {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.config.interval_ms,
        }
    }

    /// Decide what to do at `now`
    ///
    /// Returns [`UploadDecision::Send`] at most once per interval. The caller
    /// must follow a `Send` with [`record_outcome`](Self::record_outcome).
    pub fn poll(&mut self, now: Timestamp) -> UploadDecision {
        if !self.is_due(now) {
            return UploadDecision::Wait;
        }

        self.last_sent = Some(now);

        if self.first_reading_pending {
            self.first_reading_pending = false;
            self.state = UploadState::Idle;
            self.stats.discarded += 1;
            log_info!("Skipping first upload window while sensors stabilize");
            return UploadDecision::Discard;
        }

        self.state = UploadState::Sending;
        self.stats.attempted += 1;
        UploadDecision::Send
    }

    /// Record the transport's answer and return to idle
    pub fn record_outcome(&mut self, outcome: SendOutcome) {
        match outcome {
            SendOutcome::Delivered => self.stats.delivered += 1,
            SendOutcome::Queued => self.stats.queued += 1,
            SendOutcome::Failed => {
                self.stats.failed += 1;
                log_warn!("Upload failed, next attempt in {} ms", self.config.interval_ms);
            }
        }
        self.state = UploadState::Idle;
    }
}

impl Default for UploadScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}
