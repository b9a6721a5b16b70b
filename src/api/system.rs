use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiResponse, AppState, HealthResponse};

/// `GET /api/health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthResponse>> {
    let session = state.session.read().await;

    Json(ApiResponse::success(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.start_time.elapsed().as_secs(),
        store_key: session.store_key().to_string(),
        records: session.len(),
    }))
}
