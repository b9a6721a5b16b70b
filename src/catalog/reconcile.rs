//! Import reconciliation.
//!
//! Combines an externally supplied record set with the current one. Payload
//! validation happens up front: a payload is either accepted whole or rejected
//! whole, so a failed import never touches the store.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::ImportError;
use crate::domain::RecordId;
use crate::models::record::MediaRecord;

/// How an import combines with the existing records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Keep every existing record; append incoming records with unseen ids.
    #[default]
    Merge,
    /// Discard the current records in favour of the incoming set.
    ///
    /// The incoming set must not repeat an id: a payload that does is
    /// rejected with [`ImportError::DuplicateId`] and nothing is replaced.
    /// Merge instead keeps the first occurrence and skips the rest.
    Replace,
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge => f.write_str("merge"),
            Self::Replace => f.write_str("replace"),
        }
    }
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "replace" => Ok(Self::Replace),
            other => Err(format!("unknown merge policy: '{other}'")),
        }
    }
}

/// Outcome of an accepted import, for user-facing messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub policy: MergePolicy,
    pub incoming: usize,
    pub added: usize,
    pub skipped: usize,
    pub total: usize,
}

/// Validates and reconciles an import payload against `current`.
///
/// # Errors
///
/// Returns [`ImportError`] when the payload is rejected; `current` is never
/// modified either way.
pub fn import(
    current: &[MediaRecord],
    payload: &str,
    policy: MergePolicy,
) -> Result<(Vec<MediaRecord>, ImportSummary), ImportError> {
    let incoming = parse_payload(payload)?;
    reconcile_checked(current, incoming, policy)
}

/// Same as [`import`] for a payload that has already been parsed as JSON.
///
/// # Errors
///
/// See [`import`].
pub fn import_value(
    current: &[MediaRecord],
    payload: Value,
    policy: MergePolicy,
) -> Result<(Vec<MediaRecord>, ImportSummary), ImportError> {
    let incoming = parse_value(payload)?;
    reconcile_checked(current, incoming, policy)
}

fn reconcile_checked(
    current: &[MediaRecord],
    incoming: Vec<MediaRecord>,
    policy: MergePolicy,
) -> Result<(Vec<MediaRecord>, ImportSummary), ImportError> {
    if policy == MergePolicy::Replace
        && let Some(id) = first_duplicate(&incoming)
    {
        return Err(ImportError::DuplicateId(id));
    }

    let incoming_count = incoming.len();
    let result = reconcile(current, incoming, policy);

    let added = match policy {
        MergePolicy::Merge => result.len() - current.len(),
        MergePolicy::Replace => result.len(),
    };

    let summary = ImportSummary {
        policy,
        incoming: incoming_count,
        added,
        skipped: incoming_count - added,
        total: result.len(),
    };

    Ok((result, summary))
}

/// Parses import text into records.
///
/// # Errors
///
/// - [`ImportError::Syntax`] if the text is not JSON
/// - [`ImportError::NotAnArray`] if the top-level value is not an array
/// - [`ImportError::MalformedRecord`] for the first element that is not a
///   well-formed record
pub fn parse_payload(payload: &str) -> Result<Vec<MediaRecord>, ImportError> {
    let value: Value = serde_json::from_str(payload)?;
    parse_value(value)
}

/// Parses an already-decoded JSON value into records.
///
/// # Errors
///
/// See [`parse_payload`].
pub fn parse_value(value: Value) -> Result<Vec<MediaRecord>, ImportError> {
    let Value::Array(elements) = value else {
        return Err(ImportError::NotAnArray {
            found: json_kind(&value),
        });
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            let record: MediaRecord =
                serde_json::from_value(element).map_err(|e| ImportError::MalformedRecord {
                    index,
                    reason: e.to_string(),
                })?;
            record
                .validate()
                .map_err(|e| ImportError::MalformedRecord {
                    index,
                    reason: e.to_string(),
                })?;
            Ok(record)
        })
        .collect()
}

/// Pure reconciliation of two well-formed record sets.
#[must_use]
pub fn reconcile(
    current: &[MediaRecord],
    incoming: Vec<MediaRecord>,
    policy: MergePolicy,
) -> Vec<MediaRecord> {
    match policy {
        MergePolicy::Merge => merge(current, incoming),
        MergePolicy::Replace => incoming,
    }
}

/// Existing records win; incoming records with unseen ids are appended in
/// their original order. An id repeated inside `incoming` is kept once.
#[must_use]
pub fn merge(current: &[MediaRecord], incoming: Vec<MediaRecord>) -> Vec<MediaRecord> {
    let mut seen: HashSet<RecordId> = current.iter().map(|r| r.id.clone()).collect();
    let mut combined = current.to_vec();

    for record in incoming {
        if seen.insert(record.id.clone()) {
            combined.push(record);
        }
    }

    combined
}

fn first_duplicate(records: &[MediaRecord]) -> Option<RecordId> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .iter()
        .find(|r| !seen.insert(&r.id))
        .map(|r| r.id.clone())
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Rating, Status};
    use serde_json::json;

    fn record(id: &str, rating: f64, created_at: i64) -> MediaRecord {
        MediaRecord {
            id: RecordId::new(id),
            title: format!("Title {id}"),
            category: Category::Anime,
            status: Status::Completed,
            rating: Rating::new(rating).unwrap(),
            description: String::new(),
            image_url: String::new(),
            playback_url: None,
            manual_rank: None,
            genres: Vec::new(),
            created_at,
        }
    }

    #[test]
    fn merge_keeps_existing_and_appends_new() {
        let current = vec![record("1", 9.0, 100)];
        let incoming = vec![record("1", 2.0, 1), record("2", 5.0, 50)];

        let merged = merge(&current, incoming);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], record("1", 9.0, 100));
        assert_eq!(merged[1], record("2", 5.0, 50));
    }

    #[test]
    fn merge_is_idempotent() {
        let current = vec![record("a", 1.0, 1), record("b", 2.0, 2)];
        let incoming = vec![record("c", 3.0, 3), record("a", 9.0, 9), record("d", 4.0, 4)];

        let once = merge(&current, incoming.clone());
        let twice = merge(&once, incoming);

        assert_eq!(once, twice);
    }

    #[test]
    fn merge_preserves_every_existing_record() {
        let current = vec![record("a", 1.0, 1), record("b", 2.0, 2)];
        let incoming = vec![record("b", 10.0, 99), record("c", 3.0, 3)];

        let merged = merge(&current, incoming);
        for existing in &current {
            let found = merged.iter().find(|r| r.id == existing.id).unwrap();
            assert_eq!(found, existing);
        }
        assert_eq!(merged.len(), current.len() + 1);
    }

    #[test]
    fn merge_keeps_first_of_repeated_incoming_id() {
        let merged = merge(&[], vec![record("x", 1.0, 1), record("x", 7.0, 7)]);
        assert_eq!(merged, vec![record("x", 1.0, 1)]);
    }

    #[test]
    fn replace_returns_incoming_verbatim() {
        let current = vec![record("a", 1.0, 1)];
        let incoming = vec![record("z", 4.0, 4), record("y", 3.0, 3)];

        assert_eq!(reconcile(&current, incoming.clone(), MergePolicy::Replace), incoming);
    }

    #[test]
    fn import_rejects_non_array() {
        let current = vec![record("a", 1.0, 1)];
        let err = import(&current, r#"{"id":"1"}"#, MergePolicy::Merge).unwrap_err();
        assert!(matches!(err, ImportError::NotAnArray { found: "an object" }));
    }

    #[test]
    fn import_rejects_invalid_json() {
        let err = import(&[], "[{", MergePolicy::Merge).unwrap_err();
        assert!(matches!(err, ImportError::Syntax(_)));
    }

    #[test]
    fn import_rejects_whole_payload_on_one_malformed_element() {
        let payload = json!([
            {"id": "1", "title": "Ok", "category": "Anime", "status": "Watching", "rating": 5, "createdAt": 1},
            {"id": "2", "title": "Bad", "category": "Anime", "status": "Watching", "rating": 42, "createdAt": 2}
        ])
        .to_string();

        let err = import(&[], &payload, MergePolicy::Merge).unwrap_err();
        assert!(matches!(err, ImportError::MalformedRecord { index: 1, .. }));
    }

    #[test]
    fn import_rejects_blank_title() {
        let payload = json!([
            {"id": "1", "title": "  ", "category": "Anime", "status": "Watching", "rating": 5, "createdAt": 1}
        ])
        .to_string();

        assert!(matches!(
            import(&[], &payload, MergePolicy::Replace),
            Err(ImportError::MalformedRecord { index: 0, .. })
        ));
    }

    #[test]
    fn replace_rejects_duplicate_ids() {
        let payload = serde_json::to_string(&vec![record("d", 1.0, 1), record("d", 2.0, 2)]).unwrap();
        let err = import(&[], &payload, MergePolicy::Replace).unwrap_err();
        assert!(matches!(err, ImportError::DuplicateId(id) if id.as_str() == "d"));
    }

    #[test]
    fn import_summary_counts() {
        let current = vec![record("1", 9.0, 100)];
        let payload = serde_json::to_string(&vec![record("1", 2.0, 1), record("2", 5.0, 50)]).unwrap();

        let (merged, summary) = import(&current, &payload, MergePolicy::Merge).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(
            summary,
            ImportSummary {
                policy: MergePolicy::Merge,
                incoming: 2,
                added: 1,
                skipped: 1,
                total: 2,
            }
        );

        let (replaced, summary) = import(&current, &payload, MergePolicy::Replace).unwrap();
        assert_eq!(replaced.len(), 2);
        assert_eq!(summary.added, 2);
        assert_eq!(summary.skipped, 0);
    }

    #[test]
    fn policy_parses_from_text() {
        assert_eq!("Replace".parse::<MergePolicy>().unwrap(), MergePolicy::Replace);
        assert!("overwrite".parse::<MergePolicy>().is_err());
    }
}
