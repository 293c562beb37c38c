//! Station main loop
//!
//! ## Overview
//!
//! [`Station`] owns the engine and every collaborator, and runs one tick per
//! iteration:
//!
//! ```text
//! clock ──► sensor.read ──┐
//! cpu.read ───────────────┼──► Engine::tick ──► renderer.render
//! sun events (per date) ──┘          │
//!                                    └─► payload? ──► sink.submit ──► record_upload
//! ```
//!
//! A failed sensor read or a rejected sample skips the tick. A failed CPU
//! read only drops that tick's CPU value. A failed sun lookup blanks the
//! day/night indicator until the date changes.

use std::future::Future;
use std::time::Duration;

use chrono::{FixedOffset, NaiveDate};

use enviro_core::{
    time::{local_time, SystemTime, TimeSource},
    CpuTemperatureSource, Engine, Renderer, SampleError, SampleResult, SensorSample,
    SensorSource, SunEventSource, SunEvents, TelemetrySink, TickInput, TickOutput, UploadStats,
};

/// Counters reported when the loop stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks that produced a frame
    pub ticks: u64,
    /// Ticks skipped for bad or missing samples
    pub skipped: u64,
    /// Upload counters
    pub uploads: UploadStats,
}

/// The sampling station
pub struct Station<S, P, A, R, K, C = SystemTime> {
    engine: Engine,
    sensor: S,
    cpu: P,
    sun: A,
    renderer: R,
    sink: K,
    clock: C,
    offset: FixedOffset,
    sun_cache: Option<(NaiveDate, Option<SunEvents>)>,
    read_failures: u64,
}

impl<S, P, A, R, K, C> Station<S, P, A, R, K, C>
where
    S: SensorSource,
    P: CpuTemperatureSource,
    A: SunEventSource,
    R: Renderer,
    K: TelemetrySink,
    C: TimeSource,
{
    /// Assemble a station
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        engine: Engine,
        sensor: S,
        cpu: P,
        sun: A,
        renderer: R,
        sink: K,
        clock: C,
        offset: FixedOffset,
    ) -> Self {
        Self {
            engine,
            sensor,
            cpu,
            sun,
            renderer,
            sink,
            clock,
            offset,
            sun_cache: None,
            read_failures: 0,
        }
    }

    /// Sun events for `date`, looked up once per date
    fn sun_events(&mut self, date: NaiveDate) -> Option<SunEvents> {
        match self.sun_cache {
            Some((cached, events)) if cached == date => events,
            _ => {
                let events = match SunEvents::lookup(&self.sun, date) {
                    Ok(events) => Some(events),
                    Err(e) => {
                        log::warn!("Sun lookup for {} failed: {}", date, e);
                        None
                    }
                };
                self.sun_cache = Some((date, events));
                events
            }
        }
    }

    /// Run a single tick
    pub fn tick_once(&mut self) -> SampleResult<TickOutput> {
        let now = self.clock.now();

        let reading = match self.sensor.read() {
            Ok(reading) => reading,
            Err(e) => {
                self.read_failures += 1;
                log::warn!("Sensor read failed, skipping tick: {}", e);
                return Err(e);
            }
        };

        let cpu_temperature = match self.cpu.read() {
            Ok(t) => Some(t),
            Err(e) => {
                log::debug!("CPU temperature unavailable: {}", e);
                None
            }
        };

        let local_time = local_time(now, self.offset).ok_or(SampleError::SensorUnavailable {
            reason: "clock outside supported range",
        })?;
        let sun_events = self.sun_events(local_time.date_naive());

        let input = TickInput {
            sample: SensorSample::stamp(reading, now),
            cpu_temperature,
            local_time,
            sun_events,
        };

        let output = match self.engine.tick(&input) {
            Ok(output) => output,
            // Already logged by the engine
            Err(e) => return Err(e),
        };

        self.renderer.render(&output.frame);

        if let Some(payload) = output.payload {
            let outcome = self.sink.submit(payload);
            self.engine.record_upload(outcome);
        }

        Ok(output)
    }

    /// Counters so far
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.engine.ticks(),
            skipped: self.engine.skipped_ticks() + self.read_failures,
            uploads: self.engine.upload_stats(),
        }
    }

    /// Tick every `tick_delay` until `shutdown` completes
    ///
    /// The delay is a trailing sleep, so the real period is the delay plus
    /// the tick's own duration.
    pub async fn run<F>(mut self, tick_delay: Duration, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let _ = self.tick_once();

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(tick_delay) => {}
            }
        }

        let summary = self.summary();
        log::info!(
            "Station stopped after {} ticks ({} skipped)",
            summary.ticks,
            summary.skipped
        );
        summary
    }

    /// Engine state
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Renderer
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Telemetry sink
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Clock, for driving simulated time
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{LogRenderer, LogSink};
    use chrono::TimeZone;
    use enviro_core::{
        time::FixedTime, AstroError, DayEvents, EngineConfig, RawReading, UploadDecision,
    };
    use std::cell::Cell;

    const START: u64 = 1_717_977_600_000; // 2024-06-10T00:00:00Z

    struct Script {
        fail_every: Option<u64>,
        reads: u64,
    }

    impl SensorSource for Script {
        fn read(&mut self) -> SampleResult<RawReading> {
            self.reads += 1;
            if self.fail_every.is_some_and(|n| self.reads % n == 0) {
                return Err(SampleError::SensorUnavailable { reason: "i2c nack" });
            }
            Ok(RawReading {
                temperature: 26.0,
                humidity: 50.0,
                pressure: 1012.0,
                light: 300.0,
            })
        }
    }

    struct Cpu(Option<f32>);

    impl CpuTemperatureSource for Cpu {
        fn read(&mut self) -> SampleResult<f32> {
            self.0.ok_or(SampleError::SensorUnavailable { reason: "no zone" })
        }
    }

    struct Sun {
        lookups: Cell<u32>,
        polar: bool,
    }

    impl SunEventSource for Sun {
        fn events_on(&self, date: NaiveDate) -> Result<DayEvents, AstroError> {
            self.lookups.set(self.lookups.get() + 1);
            if self.polar {
                return Err(AstroError::NoSunset);
            }
            let offset = FixedOffset::east_opt(0).unwrap();
            let at = |h| {
                offset
                    .from_local_datetime(&date.and_hms_opt(h, 0, 0).unwrap())
                    .unwrap()
            };
            Ok(DayEvents {
                sunrise: at(6),
                sunset: at(20),
            })
        }
    }

    type TestStation = Station<Script, Cpu, Sun, LogRenderer, LogSink, FixedTime>;

    fn station(fail_every: Option<u64>, cpu: Option<f32>, polar: bool) -> TestStation {
        Station::new(
            Engine::new(EngineConfig::default(), START),
            Script {
                fail_every,
                reads: 0,
            },
            Cpu(cpu),
            Sun {
                lookups: Cell::new(0),
                polar,
            },
            LogRenderer::new(),
            LogSink::new(),
            FixedTime::new(START + 12 * 3_600_000),
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    fn run_ticks(station: &mut TestStation, n: usize) {
        for _ in 0..n {
            let _ = station.tick_once();
            station.clock_mut().advance(1000);
        }
    }

    #[test]
    fn tick_renders_and_corrects() {
        let mut station = station(None, Some(46.0), false);

        let output = station.tick_once().unwrap();
        assert_eq!(output.corrected.temperature, 16.0);
        assert_eq!(station.renderer().frames(), 1);

        let sun = output.frame.sun.unwrap();
        assert!(sun.is_day);
        assert!((sun.fraction() - 6.0 / 14.0).abs() < 1e-9);
    }

    #[test]
    fn sensor_failure_skips_tick() {
        let mut station = station(Some(3), Some(46.0), false);
        run_ticks(&mut station, 9);

        let summary = station.summary();
        assert_eq!(summary.ticks, 6);
        assert_eq!(summary.skipped, 3);
        assert_eq!(station.renderer().frames(), 6);
    }

    #[test]
    fn missing_cpu_still_ticks() {
        let mut station = station(None, None, false);
        let output = station.tick_once().unwrap();

        assert_eq!(output.corrected.temperature, 26.0);
        assert_eq!(station.engine().correction().cpu_history_len(), 0);
    }

    #[test]
    fn sun_lookup_is_cached_per_date() {
        let mut station = station(None, Some(46.0), false);
        run_ticks(&mut station, 10);

        // Today, yesterday and tomorrow
        assert_eq!(station.sun.lookups.get(), 3);

        station.clock_mut().advance(24 * 3_600_000);
        run_ticks(&mut station, 1);
        assert_eq!(station.sun.lookups.get(), 6);
    }

    #[test]
    fn sun_failure_blanks_indicator() {
        let mut station = station(None, Some(46.0), true);
        run_ticks(&mut station, 5);

        let frame = station.renderer().last().unwrap();
        assert_eq!(frame.sun, None);
        assert_eq!(frame.sun_fraction(), 0.0);
        // Failure cached too
        assert_eq!(station.sun.lookups.get(), 1);
    }

    #[test]
    fn payloads_reach_the_sink() {
        let mut station = station(None, Some(46.0), false);

        let mut decisions = Vec::new();
        for _ in 0..=120 {
            decisions.push(station.tick_once().unwrap().upload);
            station.clock_mut().advance(1000);
        }

        assert_eq!(decisions[0], UploadDecision::Discard);
        assert_eq!(station.sink().count(), 2);
        assert_eq!(station.summary().uploads.delivered, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_on_shutdown() {
        let station = station(None, Some(46.0), false);
        let summary = station
            .run(Duration::from_millis(1000), tokio::time::sleep(Duration::from_millis(4500)))
            .await;

        // Ticks at 0, 1, 2, 3 and 4 s, then shutdown at 4.5 s
        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.skipped, 0);
    }

    #[tokio::test]
    async fn run_ticks_once_when_already_shut_down() {
        let station = station(None, Some(46.0), false);
        let summary = station.run(Duration::from_secs(60), async {}).await;
        assert_eq!(summary.ticks, 1);
    }
}
