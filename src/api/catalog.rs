use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;

use super::validation::{validate_record_id, validate_search};
use super::{
    ApiError, ApiResponse, AppState, DeleteResponse, GenresResponse, ImportParams,
    ImportResponse, RecordResponse,
};
use crate::catalog::view::{self, SUGGESTED_GENRES};
use crate::catalog::{CatalogView, CategoryCounts, QueryConfig};
use crate::models::record::{MediaRecord, RecordDraft};

/// `GET /api/catalog`
///
/// Out-of-range pages are clamped to the nearest existing page.
pub async fn get_view(
    State(state): State<Arc<AppState>>,
    query: Result<Query<QueryConfig>, QueryRejection>,
) -> Result<Json<ApiResponse<CatalogView>>, ApiError> {
    let Query(mut query) = query.map_err(|e| ApiError::validation(e.body_text()))?;
    validate_search(&query.search)?;

    let session = state.session.read().await;
    let matches = view::filter(session.records(), &query).len();
    query.page = view::clamp_page(query.page, view::total_pages(matches));

    Ok(Json(ApiResponse::success(session.view(&query))))
}

/// `GET /api/catalog/counts`
pub async fn get_counts(State(state): State<Arc<AppState>>) -> Json<ApiResponse<CategoryCounts>> {
    let session = state.session.read().await;
    Json(ApiResponse::success(session.counts()))
}

/// `GET /api/catalog/genres`
pub async fn get_genres(State(state): State<Arc<AppState>>) -> Json<ApiResponse<GenresResponse>> {
    let session = state.session.read().await;
    Json(ApiResponse::success(GenresResponse {
        known: session.genres(),
        suggested: SUGGESTED_GENRES.to_vec(),
    }))
}

/// `POST /api/catalog/records`
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<RecordDraft>,
) -> Json<ApiResponse<RecordResponse>> {
    let mut session = state.session.write().await;
    let (record, sync) = session.create(draft).await;

    Json(ApiResponse::success(RecordResponse { record, sync }))
}

/// `GET /api/catalog/records/{id}`
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MediaRecord>>, ApiError> {
    let id = validate_record_id(&id)?;
    let session = state.session.read().await;

    let record = session
        .get(&id)
        .cloned()
        .ok_or_else(|| ApiError::record_not_found(&id))?;

    Ok(Json(ApiResponse::success(record)))
}

/// `PUT /api/catalog/records/{id}`
pub async fn update_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<RecordDraft>,
) -> Result<Json<ApiResponse<RecordResponse>>, ApiError> {
    let id = validate_record_id(&id)?;
    let mut session = state.session.write().await;
    let (record, sync) = session.revise(&id, draft).await?;

    Ok(Json(ApiResponse::success(RecordResponse { record, sync })))
}

/// `DELETE /api/catalog/records/{id}`
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteResponse>>, ApiError> {
    let id = validate_record_id(&id)?;
    let mut session = state.session.write().await;
    let (removed, sync) = session.delete(&id).await;

    Ok(Json(ApiResponse::success(DeleteResponse { removed, sync })))
}

/// `POST /api/catalog/import?policy=merge|replace`
///
/// The body is the raw text of an exported file.
pub async fn import_records(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ImportParams>, QueryRejection>,
    body: String,
) -> Result<Json<ApiResponse<ImportResponse>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::validation(e.body_text()))?;

    let mut session = state.session.write().await;
    let (summary, sync) = session.import(&body, params.policy).await?;

    Ok(Json(ApiResponse::success(ImportResponse { summary, sync })))
}

/// `GET /api/catalog/export`
pub async fn export_records(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.session.read().await;
    let body = session
        .export()
        .map_err(|e| ApiError::internal(format!("Failed to serialize snapshot: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"metadata.json\"",
            ),
        ],
        body,
    ))
}
