use std::time::Duration;

use anyhow::Context;
use chrono::FixedOffset;
use log::{error, info, warn};

use enviro_connectors::{http::HttpTransport, uploader, ConnectionStats};
use enviro_core::{
    time::{local_time, SystemTime, TimeSource},
    Engine, SolarCalculator, SunEvents, TelemetrySink,
};
use enviro_station::{
    config::{self, StationConfig},
    LogRenderer, LogSink, RunSummary, SimulatedSensor, Station, ThermalZone,
};

const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

async fn run_station<K: TelemetrySink>(
    config: &StationConfig,
    offset: FixedOffset,
    solar: SolarCalculator,
    sink: K,
) -> RunSummary {
    let engine = Engine::new(config.engine_config(), SystemTime.now());
    let station = Station::new(
        engine,
        SimulatedSensor::new(config.sampling.simulation_seed),
        ThermalZone::new(&config.cpu_temperature_path),
        solar,
        LogRenderer::new(),
        sink,
        SystemTime,
        offset,
    );
    station.run(config.tick_delay(), shutdown_signal()).await
}

fn log_transport(stats: &ConnectionStats) {
    info!(
        "Collector: {} sent, {} failed, {} bytes",
        stats.messages_sent, stats.messages_failed, stats.bytes_sent
    );
    if let Some(e) = &stats.last_error {
        info!("Last upload error: {}", e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = config::resolve_path(std::env::args().nth(1), std::env::var("ENVIRO_CONFIG").ok());
    let mut config = StationConfig::load(&path)
        .with_context(|| format!("loading configuration from {}", path.display()))?;
    config.apply_api_key_override(std::env::var("ENVIRO_API_KEY").ok());
    config.validate().context("validating configuration")?;

    let offset = config.location.offset()?;
    let solar = SolarCalculator::new(config.location.latitude, config.location.longitude, offset);

    // Fail fast where the sun never crosses the horizon today
    let today = local_time(SystemTime.now(), offset)
        .context("system clock outside supported range")?
        .date_naive();
    let events = SunEvents::lookup(&solar, today)
        .with_context(|| format!("computing sun events for {}", config.location.name))?;
    info!(
        "{}: sunrise {}, sunset {}",
        config.location.name,
        events.sunrise_today.format("%H:%M"),
        events.sunset_today.format("%H:%M")
    );

    for warning in config.startup_warnings() {
        warn!("{}", warning);
    }

    if !config.telemetry.enabled {
        let summary = run_station(&config, offset, solar, LogSink::new()).await;
        info!("Uploads: {:?}", summary.uploads);
        return Ok(());
    }

    let transport = HttpTransport::new(config.telemetry.http_config())
        .context("configuring collector transport")?;
    let (handle, worker) = uploader::channel(transport);
    let worker = tokio::spawn(worker.run());

    // The handle is dropped when the station stops, which lets the worker drain
    let summary = run_station(&config, offset, solar, handle).await;
    info!("Uploads: {:?}", summary.uploads);

    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(stats)) => log_transport(&stats),
        Ok(Err(e)) => warn!("Upload worker panicked: {}", e),
        Err(_) => warn!("Upload worker still busy after {:?}, abandoning", WORKER_DRAIN_TIMEOUT),
    }

    Ok(())
}
