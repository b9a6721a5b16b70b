use super::ApiError;
use crate::domain::RecordId;

const MAX_SEARCH_LEN: usize = 200;

/// Path ids are taken verbatim and must pass [`RecordId::is_addressable`], the
/// same rule imports enforce.
pub fn validate_record_id(id: &str) -> Result<RecordId, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::validation("Record id cannot be empty"));
    }

    let id = RecordId::new(id);
    if !id.is_addressable() {
        return Err(ApiError::validation(format!(
            "Record id must have no surrounding whitespace and be {} characters or less",
            RecordId::MAX_LEN
        )));
    }

    Ok(id)
}

pub fn validate_search(search: &str) -> Result<&str, ApiError> {
    if search.chars().count() > MAX_SEARCH_LEN {
        return Err(ApiError::validation(format!(
            "Search text must be {} characters or less",
            MAX_SEARCH_LEN
        )));
    }
    Ok(search)
}
