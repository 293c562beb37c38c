//! Headless output
//!
//! [`LogRenderer`] writes each frame as one log line in place of the LCD.
//! [`LogSink`] replaces the collector when telemetry is disabled.

use enviro_core::{Frame, Renderer, SendOutcome, TelemetryPayload, TelemetrySink};

/// One-line text form of a frame
pub fn describe(frame: &Frame) -> String {
    let sun = match frame.sun {
        Some(sun) => format!(
            "{} {:.0}%",
            if sun.is_day { "day" } else { "night" },
            sun.fraction() * 100.0
        ),
        None => "sun n/a".to_string(),
    };

    format!(
        "{} {} | {} ({}) | {} {} | {} lux {} | {} hPa {} | {}",
        frame.time,
        frame.date,
        frame.temperature,
        frame.range,
        frame.humidity,
        frame.humidity_label.upper(),
        frame.light,
        frame.light_label.upper(),
        frame.pressure,
        frame.pressure_label.upper(),
        sun,
    )
}

/// Renders frames to the log at debug level
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
    last: Option<Frame>,
}

impl LogRenderer {
    /// Create a renderer with no frames drawn yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Most recent frame
    pub fn last(&self) -> Option<&Frame> {
        self.last.as_ref()
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &Frame) {
        log::debug!("{}", describe(frame));
        self.frames += 1;
        self.last = Some(frame.clone());
    }
}

/// Sink that logs payloads instead of sending them
///
/// Only the most recent payload is kept.
#[derive(Debug, Default)]
pub struct LogSink {
    count: u64,
    last: Option<TelemetryPayload>,
}

impl LogSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads seen so far
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Most recent payload
    pub fn last(&self) -> Option<&TelemetryPayload> {
        self.last.as_ref()
    }
}

impl TelemetrySink for LogSink {
    fn submit(&mut self, payload: TelemetryPayload) -> SendOutcome {
        log::info!(
            "Telemetry disabled, reading {}: {} °C {} % {} hPa {} lux",
            payload.unix,
            payload.temperature,
            payload.humidity,
            payload.pressure,
            payload.light
        );
        self.count += 1;
        self.last = Some(payload);
        SendOutcome::Delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};
    use enviro_core::{Engine, EngineConfig, SensorSample, TickInput};

    fn frame() -> Frame {
        let mut engine = Engine::new(EngineConfig::default(), 0);
        let offset = FixedOffset::east_opt(0).unwrap();
        let local_time = DateTime::from_timestamp(1_718_020_800, 0)
            .unwrap()
            .with_timezone(&offset);

        engine
            .tick(&TickInput {
                sample: SensorSample::new(0, 24.0, 45.0, 1013.0, 1234.0),
                cpu_temperature: None,
                local_time,
                sun_events: None,
            })
            .unwrap()
            .frame
    }

    #[test]
    fn describe_includes_every_field() {
        let text = describe(&frame());

        assert!(text.starts_with("12:00 10 Jun 24"));
        assert!(text.contains("| 62% BAD |"));
        assert!(text.contains("1,234 lux"));
        assert!(text.contains("1,013 -"));
        assert!(text.ends_with("sun n/a"));
    }

    #[test]
    fn renderer_keeps_last_frame() {
        let mut renderer = LogRenderer::new();
        let frame = frame();

        renderer.render(&frame);
        renderer.render(&frame);

        assert_eq!(renderer.frames(), 2);
        assert_eq!(renderer.last(), Some(&frame));
    }

    #[test]
    fn log_sink_accepts_everything() {
        let mut sink = LogSink::new();
        let payload = TelemetryPayload::new(1, 20.0, 50.0, 1013.0, 10.0);

        assert_eq!(sink.submit(payload), SendOutcome::Delivered);
        assert_eq!(sink.count(), 1);
        assert_eq!(sink.last(), Some(&payload));
    }

    #[test]
    fn log_sink_keeps_only_latest_payload() {
        let mut sink = LogSink::new();
        for unix in 0..10_000 {
            sink.submit(TelemetryPayload::new(unix, 20.0, 50.0, 1013.0, 10.0));
        }

        assert_eq!(sink.count(), 10_000);
        assert_eq!(sink.last().map(|p| p.unix), Some(9_999));
    }
}
