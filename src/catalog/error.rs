use thiserror::Error;

use crate::domain::RecordId;

/// Domain errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    #[error("Duplicate record id: {0}")]
    DuplicateId(RecordId),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Reasons an import payload is rejected as a whole.
///
/// A rejected payload never reaches the record store.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Import payload is not valid JSON: {0}")]
    Syntax(String),

    #[error("Import payload must be a JSON array of records, found {found}")]
    NotAnArray { found: &'static str },

    #[error("Record #{index} is malformed: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("Record id {0} appears more than once in the payload")]
    DuplicateId(RecordId),
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Syntax(err.to_string())
    }
}
