//! Collaborator contracts
//!
//! The engine never talks to hardware or the network itself. The sampling loop
//! reaches its collaborators through these traits and hands the results to
//! [`Engine::tick`](crate::Engine::tick). Keep them small: a driver, a file
//! read, a lookup, a sink.

use chrono::NaiveDate;

use crate::{
    errors::{AstroError, SampleResult},
    frame::Frame,
    sample::RawReading,
    sun::DayEvents,
    upload::{SendOutcome, TelemetryPayload},
};

/// BME-class temperature/humidity/pressure sensor plus a light sensor
pub trait SensorSource {
    /// Read all channels once
    ///
    /// A failure skips the tick; the loop tries again on the next one.
    fn read(&mut self) -> SampleResult<RawReading>;
}

/// SoC temperature, used by the self-heating correction
pub trait CpuTemperatureSource {
    /// Current CPU temperature in °C
    fn read(&mut self) -> SampleResult<f32>;
}

/// Sunrise and sunset lookup for the configured location
pub trait SunEventSource {
    /// Events for one local calendar date
    fn events_on(&self, date: NaiveDate) -> Result<DayEvents, AstroError>;
}

/// Display sink, purely one-way
pub trait Renderer {
    /// Draw one frame
    fn render(&mut self, frame: &Frame);
}

/// Upload path towards the remote collector
pub trait TelemetrySink {
    /// Hand over one payload; failures are reported, never retried
    fn submit(&mut self, payload: TelemetryPayload) -> SendOutcome;
}

impl<T: SunEventSource + ?Sized> SunEventSource for &T {
    fn events_on(&self, date: NaiveDate) -> Result<DayEvents, AstroError> {
        (**self).events_on(date)
    }
}
