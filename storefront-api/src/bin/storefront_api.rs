//! Storefront API binary entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use storefront_api::{create_router, AppState, ServiceConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "storefront-api")]
#[command(about = "In-memory product and user catalogue over HTTP")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP listen address, overrides the configuration file.
    #[arg(short = 'l', long)]
    listen: Option<SocketAddr>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => ServiceConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ServiceConfig::default(),
    }
    .with_env_overrides();
    if let Some(listen) = args.listen {
        config.listen = listen;
    }
    config.validate().context("Invalid configuration")?;

    let state = Arc::new(AppState::from_config(&config));
    tracing::info!(
        products = state.products.get_all().len(),
        users = state.users.get_all().len(),
        "Tables loaded"
    );

    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .context("Failed to bind HTTP listener")?;
    tracing::info!("HTTP API listening on {}", config.listen);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
