//! Canonical in-memory record collection.
//!
//! Storage order is insertion order with new records prepended, which makes it
//! newest-first. It is consumed by the reconciler and by persistence only; the
//! display order is derived by [`crate::catalog::view`].

use std::collections::HashSet;

use super::CatalogError;
use crate::domain::RecordId;
use crate::models::record::MediaRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<MediaRecord>,
}

impl RecordStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Builds a store from an ordered record set, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two records share an id.
    pub fn from_records(records: Vec<MediaRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(&record.id) {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
        }
        Ok(Self { records })
    }

    /// Replaces the record with the same id in place, or prepends a new one.
    pub fn upsert(&mut self, record: MediaRecord) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.id == record.id) {
            *existing = record;
        } else {
            self.records.insert(0, record);
        }
    }

    /// Removes the record with `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: &RecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| &r.id != id);
        self.records.len() != before
    }

    #[must_use]
    pub fn all(&self) -> &[MediaRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&MediaRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn into_records(self) -> Vec<MediaRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::RecordDraft;

    fn record(id: &str, title: &str) -> MediaRecord {
        MediaRecord::from_draft(RecordDraft::titled(title), RecordId::new(id), 1)
    }

    fn ids(store: &RecordStore) -> Vec<&str> {
        store.all().iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn upsert_prepends_new_records() {
        let mut store = RecordStore::new();
        store.upsert(record("1", "First"));
        store.upsert(record("2", "Second"));

        assert_eq!(ids(&store), vec!["2", "1"]);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut store = RecordStore::new();
        store.upsert(record("1", "First"));
        store.upsert(record("2", "Second"));
        store.upsert(record("3", "Third"));

        store.upsert(record("2", "Second, revised"));

        assert_eq!(ids(&store), vec!["3", "2", "1"]);
        assert_eq!(
            store.get(&RecordId::new("2")).unwrap().title,
            "Second, revised"
        );
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn remove_absent_id_is_noop() {
        let mut store = RecordStore::new();
        store.upsert(record("1", "First"));

        assert!(!store.remove(&RecordId::new("missing")));
        assert_eq!(store.len(), 1);

        assert!(store.remove(&RecordId::new("1")));
        assert!(store.is_empty());
    }

    #[test]
    fn from_records_rejects_duplicate_ids() {
        let result = RecordStore::from_records(vec![record("1", "A"), record("1", "B")]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id.as_str() == "1"));
    }

    #[test]
    fn from_records_keeps_order() {
        let store =
            RecordStore::from_records(vec![record("b", "B"), record("a", "A")]).unwrap();
        assert_eq!(ids(&store), vec!["b", "a"]);
    }
}
