//! wattson — battery state monitor and charge-limit service.
//!
//! Run with:  `RUST_LOG=info wattson`

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wattson_power::{spawn_monitor, TelemetrySource, ThresholdControl};
use wattson_server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("wattson v{} starting", env!("CARGO_PKG_VERSION"));

    let config = wattson_config::load(wattson_config::default_path())?;

    // PORT belongs to the deployment environment and beats the config file.
    let port = match std::env::var("PORT") {
        Ok(raw) => raw
            .parse::<u16>()
            .with_context(|| format!("invalid PORT value '{raw}'"))?,
        Err(_) => config.server.port,
    };

    let telemetry = TelemetrySource::new();
    let monitor = spawn_monitor(
        telemetry.clone(),
        Duration::from_secs(config.monitor.interval_secs),
        Duration::from_secs(config.monitor.retry_secs),
    );

    let state = Arc::new(AppState::new(
        telemetry,
        monitor,
        ThresholdControl::new(),
    ));

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, wattson_server::router(state))
        .await
        .context("HTTP server exited")
}
