use anyhow::Context;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::catalog::CatalogSession;
use crate::config::Config;
use crate::persistence::{FileGateway, PersistenceGateway};

mod catalog;
mod data;
mod error;
mod observability;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

pub struct AppState {
    /// Single writer, many readers. Saves happen while the write lock is held
    /// so snapshots reach the gateway in mutation order.
    pub session: RwLock<CatalogSession>,

    pub config: Config,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

pub async fn create_app_state(
    config: Config,
    gateway: Arc<dyn PersistenceGateway>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store_key = gateway.store_key().to_string();
    let session = CatalogSession::open(gateway)
        .await
        .with_context(|| format!("Failed to load catalog snapshot '{store_key}'"))?;

    Ok(Arc::new(AppState {
        session: RwLock::new(session),
        config,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let gateway = Arc::new(FileGateway::new(
        config.data_dir(),
        config.general.store_key.clone(),
    ));
    create_app_state(config, gateway, prometheus_handle).await
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = &state.config.server.cors_allowed_origins;
    let body_limit = state.config.server.body_limit_mb.saturating_mul(1024 * 1024);

    let api_router = Router::new()
        .route("/data", get(data::get_data).post(data::post_data))
        .route("/catalog", get(catalog::get_view))
        .route("/catalog/counts", get(catalog::get_counts))
        .route("/catalog/genres", get(catalog::get_genres))
        .route("/catalog/records", post(catalog::create_record))
        .route(
            "/catalog/records/{id}",
            get(catalog::get_record)
                .put(catalog::update_record)
                .delete(catalog::delete_record),
        )
        .route("/catalog/import", post(catalog::import_records))
        .route("/catalog/export", get(catalog::export_records))
        .route("/health", get(system::health))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn(observability::logging_middleware))
        .with_state(state.clone());

    let cors_layer = if cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
