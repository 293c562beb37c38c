//! Background Uploader with a Latest-Value-Wins Slot
//!
//! ## Overview
//!
//! The sampling loop must never wait on the network. [`UploadHandle`] and
//! [`UploadWorker`] share a single-slot `tokio::sync::watch` channel:
//!
//! ```text
//! submit(p1) ─┐
//! submit(p2) ─┼─► [ slot: p3 ] ──► worker: send(p3)
//! submit(p3) ─┘    (p1, p2 overwritten while the worker was busy)
//! ```
//!
//! - `submit` overwrites the slot and returns immediately
//! - the worker wakes on each change, takes whatever is newest and sends it
//! - when the handle is dropped the worker drains the slot once and exits
//!
//! A payload overwritten before the worker saw it is never sent, which matches
//! the best-effort policy: an older reading is worth less than a newer one.

use tokio::sync::watch;

use enviro_core::{SendOutcome, TelemetrySink};

use crate::{AsyncTransport, ConnectionStats, TelemetryPayload};

/// Create a connected handle/worker pair around `transport`
pub fn channel<T: AsyncTransport>(transport: T) -> (UploadHandle, UploadWorker<T>) {
    let (tx, rx) = watch::channel(None);
    (UploadHandle { tx }, UploadWorker { rx, transport })
}

/// Sampling-loop side of the uploader
#[derive(Debug)]
pub struct UploadHandle {
    tx: watch::Sender<Option<TelemetryPayload>>,
}

impl UploadHandle {
    /// Replace the pending payload, returning false once the worker is gone
    pub fn offer(&self, payload: TelemetryPayload) -> bool {
        if self.tx.is_closed() {
            return false;
        }
        self.tx.send_replace(Some(payload));
        true
    }
}

impl TelemetrySink for UploadHandle {
    fn submit(&mut self, payload: TelemetryPayload) -> SendOutcome {
        if self.offer(payload) {
            SendOutcome::Queued
        } else {
            log::warn!("Upload worker stopped, dropping payload");
            SendOutcome::Failed
        }
    }
}

/// Task side of the uploader
pub struct UploadWorker<T> {
    rx: watch::Receiver<Option<TelemetryPayload>>,
    transport: T,
}

impl<T: AsyncTransport> UploadWorker<T> {
    /// Send payloads until the handle is dropped, then report the counters
    pub async fn run(mut self) -> ConnectionStats {
        while self.rx.changed().await.is_ok() {
            let pending = *self.rx.borrow_and_update();
            let Some(payload) = pending else {
                continue;
            };

            if let Err(e) = self.transport.send(&payload).await {
                log::debug!("Upload of reading {} failed: {}", payload.unix, e);
            }
        }

        log::debug!("Upload handle dropped, worker stopping");
        self.transport.stats()
    }
}
