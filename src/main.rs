//! CLI entry point for the Mars Sentinel monitor.
//!
//! Loads configuration, initializes logging, selects a reading source
//! (serial hardware, or the synthetic generator when requested or when
//! the port cannot be opened), and runs the ingest loop until Ctrl+C.
//! Dashboards and HTTP layers attach through the library API; this
//! binary only drives the core pipeline.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

use mars_sentinel::app::SentinelApp;
use mars_sentinel::config::Config;
use mars_sentinel::error::SentinelError;
use mars_sentinel::ingest::IngestLoop;
use mars_sentinel::logging::{self, LogConfig};
use mars_sentinel::source::{ReadingSource, SyntheticSource};

#[derive(Parser)]
#[command(name = "mars-sentinel")]
#[command(about = "Astronaut safety telemetry monitor", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config/sentinel.toml")]
    config: PathBuf,

    /// Use the synthetic reading source instead of hardware
    #[arg(long)]
    synthetic: bool,

    /// Serial port override (e.g. /dev/ttyACM0, COM3)
    #[arg(long)]
    port: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_from(&cli.config)?;
    if cli.synthetic {
        config.source.synthetic = true;
    }
    if let Some(port) = cli.port {
        config.source.port = port;
    }
    config
        .validate()
        .map_err(SentinelError::Configuration)?;

    logging::init(LogConfig::from_config(&config).map_err(anyhow::Error::msg)?)
        .map_err(anyhow::Error::msg)?;

    info!(
        name = %config.application.name,
        port = %config.source.port,
        synthetic = config.source.synthetic,
        "starting telemetry monitor"
    );

    let app = Arc::new(SentinelApp::from_config(&config));
    let source = build_source(&config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ingest = IngestLoop::new(source, Arc::clone(&app));
    let ingest_task = tokio::spawn(ingest.run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    let _ = shutdown_tx.send(true);

    let processed = ingest_task.await??;
    let status = app.status();
    info!(
        events = processed,
        retained = status.sensor_count,
        "shutdown complete"
    );
    Ok(())
}

fn synthetic_source(config: &Config) -> Box<dyn ReadingSource> {
    Box::new(SyntheticSource::new(Duration::from_millis(
        config.source.synthetic_interval_ms,
    )))
}

#[cfg(feature = "serial")]
fn build_source(config: &Config) -> Box<dyn ReadingSource> {
    use mars_sentinel::source::SerialSource;

    if config.source.synthetic {
        return synthetic_source(config);
    }
    match SerialSource::open(
        &config.source.port,
        config.source.baud,
        Duration::from_millis(config.source.read_timeout_ms),
    ) {
        Ok(source) => Box::new(source),
        Err(e) => {
            warn!(error = %e, "serial connection failed; falling back to synthetic data");
            synthetic_source(config)
        }
    }
}

#[cfg(not(feature = "serial"))]
fn build_source(config: &Config) -> Box<dyn ReadingSource> {
    if !config.source.synthetic {
        warn!("serial support not compiled in; using synthetic data (rebuild with --features serial)");
    }
    synthetic_source(config)
}
