//! ProjectionGateway service
//!
//! Loads configuration, initializes logging and metrics, then serves the
//! reception projection API until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use projection_engine::RangePolicy;
use std::path::PathBuf;
use tracing::info;

use projection_gateway::{
    initialize_logging, load_config, setup_signal_handlers, wait_for_shutdown, ProjectionGateway,
};

#[derive(Parser, Debug)]
#[command(name = "projection-gateway", version, about = "Reception projection REST API")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "PROJECTION_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Reject out-of-range rates and negative matchup factors
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        load_config(cli.config.as_deref()).context("Failed to load gateway configuration")?;

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.strict {
        config.engine.range_policy = RangePolicy::Strict;
    }
    config.validate().context("Invalid gateway configuration")?;

    // Initialize logging first
    initialize_logging(&config.logging)?;

    info!("Starting ProjectionGateway v{}", projection_gateway::VERSION);
    info!("Loaded configuration: {:?}", config);

    let gateway = ProjectionGateway::new(config);
    gateway.install_metrics_exporter().context("Failed to start metrics exporter")?;

    // Setup signal handlers for graceful shutdown
    let shutdown_rx = setup_signal_handlers()?;
    info!("Signal handlers configured");

    gateway
        .run(wait_for_shutdown(shutdown_rx))
        .await
        .context("ProjectionGateway failed")?;

    info!("ProjectionGateway shutdown complete");
    Ok(())
}
