//! campus-feed media service

use anyhow::{Context, Result};
use campus_feed::{config::CampusFeedConfig, handlers, observability, state::AppState};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "campus-feed")]
#[command(version)]
#[command(about = "Campus feed media ingestion service", long_about = None)]
struct Cli {
    /// Config file; defaults to the standard search locations
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Service name used to locate config files
    #[arg(long, default_value = "api")]
    service: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    observability::init()?;

    let config = match &cli.config {
        Some(path) => CampusFeedConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => CampusFeedConfig::load_for_service(&cli.service).context("loading config")?,
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::connect(config).await.context("starting services")?;
    let app = handlers::router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "campus-feed listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("campus-feed stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
