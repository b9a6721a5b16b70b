//! Whole-snapshot endpoints used by the remote gateway.
//!
//! These two routes speak the bare snapshot format rather than the
//! [`ApiResponse`](super::ApiResponse) envelope so any client that can read and
//! write a JSON array can act as a gateway peer.

use axum::{Json, extract::State};
use std::sync::Arc;
use tracing::info;

use super::{ApiError, AppState, SaveResponse};
use crate::catalog::{MergePolicy, SyncStatus};
use crate::models::record::MediaRecord;

/// `GET /api/data`
pub async fn get_data(State(state): State<Arc<AppState>>) -> Json<Vec<MediaRecord>> {
    let session = state.session.read().await;
    Json(session.records().to_vec())
}

/// `POST /api/data`
///
/// Replaces the whole store with the posted array.
pub async fn post_data(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<SaveResponse>, ApiError> {
    let mut session = state.session.write().await;
    let (summary, sync) = session.import(&body, MergePolicy::Replace).await?;

    if let SyncStatus::Failed { message } = sync {
        return Err(ApiError::persistence(message));
    }

    info!(records = summary.total, "Snapshot replaced");

    Ok(Json(SaveResponse {
        success: true,
        message: "Data saved successfully".to_string(),
    }))
}
