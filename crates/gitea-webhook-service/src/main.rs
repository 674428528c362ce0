//! # Gitea Webhook Service
//!
//! Binary entry point. Loads configuration, installs logging and serves the
//! webhook endpoint until Ctrl+C or SIGTERM.

use anyhow::Context;
use clap::Parser;
use gitea_webhook_service::{start_server, ServiceConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Receive Gitea webhooks and report commit statuses
#[derive(Debug, Parser)]
#[command(name = "gitea-webhook-service", version, about)]
struct Args {
    /// Additional configuration file, applied after the default locations
    #[arg(short, long, env = "GW_CONFIG_FILE")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ServiceConfig::load(args.config.as_deref())
        .context("Failed to load service configuration")?;

    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config_file = ?args.config,
        "Starting Gitea webhook service"
    );

    start_server(config).await.context("HTTP server failed")?;

    Ok(())
}

fn init_logging(config: &ServiceConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json_format {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
