//! Serve command handler

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use crate::api;
use crate::config::Config;
use crate::persistence::PersistenceGateway;

pub async fn cmd_serve(
    config: Config,
    gateway: Arc<dyn PersistenceGateway>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<()> {
    info!(
        "Oniscenary v{} starting web server...",
        env!("CARGO_PKG_VERSION")
    );

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let state = api::create_app_state(config, gateway, prometheus_handle).await?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🌐 Web Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}
