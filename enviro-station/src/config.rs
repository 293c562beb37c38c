//! Station configuration
//!
//! Loaded once at startup from a JSON file:
//!
//! ```json
//! {
//!   "location": { "name": "Sheffield", "latitude": 53.38, "longitude": -1.47, "utc_offset_minutes": 60 },
//!   "correction": { "factor": 2.0, "offset": 0.0 },
//!   "telemetry": { "url": "https://collector.example/enviro/api/v1", "api_key": "..." },
//!   "sampling": { "tick_delay_ms": 1000, "warmup_secs": 30 }
//! }
//! ```
//!
//! Only `location` is required. The file path comes from the first CLI
//! argument, then `ENVIRO_CONFIG`, then `enviro.json`. `ENVIRO_API_KEY`
//! overrides the key from the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::FixedOffset;
use serde::Deserialize;
use thiserror::Error;

use enviro_connectors::http::{HttpConfig, API_KEY_HEADER};
use enviro_core::{
    constants::{time::DEFAULT_UPLOAD_TIMEOUT_SECS, DEFAULT_TICK_DELAY_MS},
    CorrectionConfig, EngineConfig, SchedulerConfig,
};

/// Default configuration file name
pub const DEFAULT_CONFIG_PATH: &str = "enviro.json";

/// Default CPU temperature file on Raspberry Pi OS
pub const DEFAULT_CPU_TEMPERATURE_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Cannot read {path}: {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// File is not valid configuration JSON
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Where the station is
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LocationConfig {
    /// Display name
    pub name: String,
    /// Degrees north
    pub latitude: f64,
    /// Degrees east
    pub longitude: f64,
    /// Fixed local offset from UTC
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl LocationConfig {
    /// Local UTC offset
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "utc_offset_minutes {} out of range",
                self.utc_offset_minutes
            ))
        })
    }
}

/// Self-heating calibration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorrectionSection {
    /// CPU difference dampening
    pub factor: f32,
    /// Static offset (°C)
    pub offset: f32,
}

impl Default for CorrectionSection {
    fn default() -> Self {
        let defaults = CorrectionConfig::default();
        Self {
            factor: defaults.factor,
            offset: defaults.offset,
        }
    }
}

/// Remote collector settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Collector endpoint
    pub url: String,
    /// Value of the `X-Api-Key` header
    pub api_key: String,
    /// Request timeout
    pub timeout_secs: u64,
    /// Minimum time between uploads
    pub interval_secs: u64,
    /// Set to false to log payloads instead of sending them
    pub enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_secs: DEFAULT_UPLOAD_TIMEOUT_SECS,
            interval_secs: 60,
            enabled: true,
        }
    }
}

impl TelemetryConfig {
    /// Transport configuration for the collector
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig::new(self.url.clone())
            .api_key(API_KEY_HEADER, self.api_key.clone())
            .timeout_secs(self.timeout_secs)
    }
}

/// Loop timing
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    /// Sleep after each tick
    pub tick_delay_ms: u64,
    /// Min/max range warm-up
    pub warmup_secs: u64,
    /// Seed for the simulated sensor
    pub simulation_seed: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            tick_delay_ms: DEFAULT_TICK_DELAY_MS,
            warmup_secs: 30,
            simulation_seed: 42,
        }
    }
}

fn default_cpu_temperature_path() -> PathBuf {
    PathBuf::from(DEFAULT_CPU_TEMPERATURE_PATH)
}

/// Complete station configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StationConfig {
    /// Location for sunrise/sunset
    pub location: LocationConfig,
    /// Temperature calibration
    #[serde(default)]
    pub correction: CorrectionSection,
    /// Upload settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Loop timing
    #[serde(default)]
    pub sampling: SamplingConfig,
    /// CPU thermal zone file
    #[serde(default = "default_cpu_temperature_path")]
    pub cpu_temperature_path: PathBuf,
}

/// Pick the configuration path: CLI argument, then environment, then default
pub fn resolve_path(arg: Option<String>, env: Option<String>) -> PathBuf {
    arg.or(env)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

impl StationConfig {
    /// Parse configuration JSON
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Apply an API key from the environment
    pub fn apply_api_key_override(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            self.telemetry.api_key = key;
        }
    }

    /// Check ranges and formats
    pub fn validate(&self) -> Result<(), ConfigError> {
        let factor = self.correction.factor;
        if !factor.is_finite() || factor == 0.0 {
            return Err(ConfigError::Invalid(format!(
                "correction factor must be finite and non-zero, got {}",
                factor
            )));
        }
        if !self.correction.offset.is_finite() {
            return Err(ConfigError::Invalid("correction offset must be finite".into()));
        }

        let location = &self.location;
        if !(-90.0..=90.0).contains(&location.latitude) {
            return Err(ConfigError::Invalid(format!(
                "latitude {} outside [-90, 90]",
                location.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&location.longitude) {
            return Err(ConfigError::Invalid(format!(
                "longitude {} outside [-180, 180]",
                location.longitude
            )));
        }
        location.offset()?;

        let telemetry = &self.telemetry;
        if telemetry.enabled
            && !telemetry.url.starts_with("http://")
            && !telemetry.url.starts_with("https://")
        {
            return Err(ConfigError::Invalid(
                "telemetry url must start with http:// or https://".into(),
            ));
        }
        if telemetry.interval_secs == 0 {
            return Err(ConfigError::Invalid("telemetry interval must be positive".into()));
        }
        if telemetry.timeout_secs == 0 {
            return Err(ConfigError::Invalid("telemetry timeout must be positive".into()));
        }

        Ok(())
    }

    /// Engine settings derived from this configuration
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_correction(
                CorrectionConfig::default()
                    .with_factor(self.correction.factor)
                    .with_offset(self.correction.offset),
            )
            .with_scheduler(SchedulerConfig::default().with_interval_secs(self.telemetry.interval_secs))
            .with_warmup_ms(self.sampling.warmup_secs.saturating_mul(1000))
    }

    /// Trailing delay after each tick
    pub fn tick_delay(&self) -> Duration {
        Duration::from_millis(self.sampling.tick_delay_ms)
    }

    /// Conditions worth a warning at startup
    ///
    /// Readings always come from the simulated sensor.
    pub fn startup_warnings(&self) -> Vec<String> {
        let mut warnings = vec![format!(
            "Readings are simulated (seed {}), not from sensor hardware",
            self.sampling.simulation_seed
        )];
        if self.telemetry.enabled {
            warnings.push(format!(
                "Simulated readings will be uploaded to {}",
                self.telemetry.url
            ));
        } else {
            warnings.push("Telemetry disabled, payloads will only be logged".to_string());
        }
        warnings
    }
}
