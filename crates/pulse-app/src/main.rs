//! Live market dashboard - Entry Point

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Live market dashboard with real-time ticker reconciliation
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via PULSE_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize TLS crypto provider (must be before any WS connections)
    pulse_ws::init_crypto();

    let args = Args::parse();

    // Determine config path: CLI arg > PULSE_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("PULSE_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    let config = pulse_app::AppConfig::from_file(&config_path)?;

    pulse_telemetry::init_logging_with(Some(&config.telemetry.log_level))?;

    info!("Starting pulse v{}", env!("CARGO_PKG_VERSION"));
    info!(
        config_path = %config_path,
        ws_url = %config.ws_url,
        watch_set_cap = config.watch_set_cap,
        "Configuration loaded"
    );

    let app = pulse_app::Application::new(config)?;
    let summary = app.run().await?;

    info!(
        ticks_processed = summary.ticks_processed,
        ticks_ignored = summary.ticks_ignored,
        alerts_fired = summary.alerts_fired,
        "Shutdown complete"
    );
    Ok(())
}
