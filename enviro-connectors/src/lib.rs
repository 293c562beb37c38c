//! Telemetry Delivery for the Enviro Station
//!
//! ## Overview
//!
//! Once a minute the engine produces a [`TelemetryPayload`] for the remote
//! collector. This crate gets it there without ever stalling the sampling
//! loop:
//!
//! ```text
//!  sampling loop ──submit──► UploadHandle ══ watch slot ══► UploadWorker ──► HttpTransport
//!   (never blocks)            (latest wins)                  (own task)      (ureq, 5 s timeout)
//! ```
//!
//! - [`http::HttpTransport`]: JSON over HTTP(S) with an API-key header, one
//!   attempt per payload
//! - [`uploader`]: a single-slot, overwrite-on-send channel plus the task that
//!   drains it, so a slow collector only delays uploads, never the display
//!
//! ## Delivery Semantics
//!
//! Best effort, at most once per payload. A failure is logged and counted in
//! [`ConnectionStats`]; the next interval's payload supersedes it. If a new
//! payload arrives while the previous one is still in flight, only the newest
//! waiting payload is sent.
//!
//! ## Example Usage
//!
//! ```no_run
//! use enviro_connectors::http::{HttpConfig, HttpTransport, API_KEY_HEADER};
//! use enviro_connectors::Transport;
//! use enviro_core::TelemetryPayload;
//!
//! let config = HttpConfig::new("https://collector.example/enviro/api/v1")
//!     .api_key(API_KEY_HEADER, "secret")
//!     .timeout_secs(5);
//! let mut transport = HttpTransport::new(config)?;
//!
//! let payload = TelemetryPayload::new(1_718_971_200, 21.35, 48.2, 1013.07, 120.0);
//! let status = transport.send(&payload)?;
//! println!("Data sent: {}", status);
//! # Ok::<(), enviro_connectors::TransportError>(())
//! ```

#[cfg(feature = "http")]
pub mod http;

pub mod uploader;

pub use enviro_core::TelemetryPayload;
pub use uploader::{UploadHandle, UploadWorker};

use thiserror::Error;

/// Transport errors
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network failure: DNS, connect, TLS or timeout
    #[error("Request failed: {0}")]
    Request(String),

    /// Collector answered with an error status
    #[error("Server error {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        message: String,
    },

    /// Payload could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid transport configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Blocking transport for a single payload
pub trait Transport {
    /// Send one payload, returning the collector's status code
    fn send(&mut self, payload: &TelemetryPayload) -> Result<u16, TransportError>;

    /// Delivery counters
    fn stats(&self) -> ConnectionStats;
}

/// Async version of [`Transport`], used by the background uploader
#[async_trait::async_trait]
pub trait AsyncTransport: Send {
    /// Send one payload, returning the collector's status code
    async fn send(&mut self, payload: &TelemetryPayload) -> Result<u16, TransportError>;

    /// Delivery counters
    fn stats(&self) -> ConnectionStats;
}

/// Delivery statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConnectionStats {
    /// Payloads acknowledged by the collector
    pub messages_sent: u64,
    /// Payloads that failed
    pub messages_failed: u64,
    /// Request body bytes sent successfully
    pub bytes_sent: u64,
    /// Status code of the last answer
    pub last_status: Option<u16>,
    /// Last error message
    pub last_error: Option<String>,
}

impl ConnectionStats {
    /// Count a delivered payload
    pub fn record_success(&mut self, status: u16, bytes: usize) {
        self.messages_sent += 1;
        self.bytes_sent += bytes as u64;
        self.last_status = Some(status);
    }

    /// Count a failed payload
    pub fn record_failure(&mut self, error: &TransportError) {
        self.messages_failed += 1;
        if let TransportError::Status { status, .. } = error {
            self.last_status = Some(*status);
        }
        self.last_error = Some(error.to_string());
    }
}
