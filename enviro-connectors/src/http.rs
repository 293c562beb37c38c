//! HTTP/HTTPS Transport for the Remote Collector
//!
//! ## Overview
//!
//! The collector is a small REST endpoint that accepts one JSON reading per
//! POST and authenticates it with an API key header:
//!
//! ```text
//! POST /enviro/api/v1
//! Content-Type: application/json
//! X-Api-Key: <key>
//!
//! {"unix":1718971200,"temp":21.35,"humidity":48.2,"pressure":1013.07,"light":120.0}
//! ```
//!
//! ## Implementation Choices
//!
//! - Blocking `ureq` client: one request a minute needs no async HTTP stack
//! - Fixed timeout (5 s by default), the only bound on a stuck request
//! - No retries: the next payload is a minute away and fresher
//! - Any non-2xx status is a failure, reported with its body
//!
//! For the sampling loop use [`AsyncTransport`], which moves the blocking call
//! onto tokio's blocking pool.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use enviro_core::{constants::time::DEFAULT_UPLOAD_TIMEOUT_SECS, SendOutcome, TelemetrySink};

use crate::{AsyncTransport, ConnectionStats, TelemetryPayload, Transport, TransportError};

/// Header carrying the collector's API key
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// HTTP configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Collector endpoint
    pub url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Authentication method
    pub auth: AuthMethod,
    /// Custom headers
    pub headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

/// Authentication methods
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// No authentication
    None,
    /// API key in header
    ApiKey {
        /// Header name
        header: String,
        /// Key
        value: String,
    },
}

impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::ApiKey { header, .. } => f
                .debug_struct("ApiKey")
                .field("header", header)
                .field("value", &"<redacted>")
                .finish(),
        }
    }
}

impl HttpConfig {
    /// Create new configuration for an endpoint URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS),
            auth: AuthMethod::None,
            headers: HashMap::new(),
            user_agent: format!("Enviro/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set API key authentication
    pub fn api_key(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth = AuthMethod::ApiKey {
            header: header.into(),
            value: value.into(),
        };
        self
    }

    /// Set request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Add custom header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// HTTP transport using the lightweight ureq client
#[derive(Clone)]
pub struct HttpTransport {
    config: HttpConfig,
    agent: ureq::Agent,
    stats: Arc<Mutex<ConnectionStats>>,
}

impl HttpTransport {
    /// Create new HTTP transport
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        if !config.url.starts_with("http://") && !config.url.starts_with("https://") {
            return Err(TransportError::Config(
                "URL must start with http:// or https://".into(),
            ));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self {
            config,
            agent,
            stats: Arc::new(Mutex::new(ConnectionStats::default())),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Build the POST request with authentication and headers
    fn build_request(&self) -> ureq::Request {
        let mut request = self.agent.post(&self.config.url);

        if let AuthMethod::ApiKey { header, value } = &self.config.auth {
            request = request.set(header, value);
        }

        for (name, value) in &self.config.headers {
            request = request.set(name, value);
        }

        request
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
    }

    fn encode(payload: &TelemetryPayload) -> Result<String, TransportError> {
        serde_json::to_string(payload).map_err(|e| TransportError::Serialization(e.to_string()))
    }

    /// Execute one request, no retries
    fn execute(request: ureq::Request, json: &str) -> Result<u16, TransportError> {
        match request.send_string(json) {
            Ok(response) => Ok(response.status()),
            Err(ureq::Error::Status(code, response)) => Err(TransportError::Status {
                status: code,
                message: response.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(e)) => Err(TransportError::Request(e.to_string())),
        }
    }

    fn record(&self, result: &Result<u16, TransportError>, bytes: usize) {
        let mut stats = match self.stats.lock() {
            Ok(stats) => stats,
            Err(poisoned) => poisoned.into_inner(),
        };

        match result {
            Ok(status) => {
                stats.record_success(*status, bytes);
                log::info!("Data sent: {}", status);
            }
            Err(e) => {
                stats.record_failure(e);
                log::warn!("Failed to send data: {}", e);
            }
        }
    }

    fn snapshot(&self) -> ConnectionStats {
        match self.stats.lock() {
            Ok(stats) => stats.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Transport for HttpTransport {
    fn send(&mut self, payload: &TelemetryPayload) -> Result<u16, TransportError> {
        let json = Self::encode(payload)?;
        let result = Self::execute(self.build_request(), &json);
        self.record(&result, json.len());
        result
    }

    fn stats(&self) -> ConnectionStats {
        self.snapshot()
    }
}

#[async_trait::async_trait]
impl AsyncTransport for HttpTransport {
    async fn send(&mut self, payload: &TelemetryPayload) -> Result<u16, TransportError> {
        let json = Self::encode(payload)?;
        let request = self.build_request();
        let bytes = json.len();

        let result = tokio::task::spawn_blocking(move || Self::execute(request, &json))
            .await
            .unwrap_or_else(|e| Err(TransportError::Request(e.to_string())));

        self.record(&result, bytes);
        result
    }

    fn stats(&self) -> ConnectionStats {
        self.snapshot()
    }
}

impl TelemetrySink for HttpTransport {
    fn submit(&mut self, payload: TelemetryPayload) -> SendOutcome {
        match Transport::send(self, &payload) {
            Ok(_) => SendOutcome::Delivered,
            Err(_) => SendOutcome::Failed,
        }
    }
}
