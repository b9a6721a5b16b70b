use serde::{Deserialize, Serialize};

use crate::catalog::{ImportSummary, MergePolicy, SyncStatus};
use crate::models::record::MediaRecord;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Reply of the snapshot write endpoint.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub record: MediaRecord,
    pub sync: SyncStatus,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub removed: bool,
    pub sync: SyncStatus,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub summary: ImportSummary,
    pub sync: SyncStatus,
}

#[derive(Debug, Serialize)]
pub struct GenresResponse {
    pub known: Vec<String>,
    pub suggested: Vec<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImportParams {
    #[serde(default)]
    pub policy: MergePolicy,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime: u64,
    pub store_key: String,
    pub records: usize,
}
