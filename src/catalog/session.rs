//! Catalog session: the explicitly owned application context.
//!
//! A session binds one [`RecordStore`] to one [`PersistenceGateway`]. Every
//! mutation is applied in memory first and then pushed to the gateway as a
//! full snapshot. A failed save is reported through [`SyncStatus`] but the
//! in-memory store stays authoritative for the rest of the session.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use super::query::QueryConfig;
use super::reconcile::{self, ImportSummary, MergePolicy};
use super::store::RecordStore;
use super::view::{self, CatalogView, CategoryCounts};
use super::{CatalogError, ImportError};
use crate::domain::RecordId;
use crate::models::record::{MediaRecord, RecordDraft};
use crate::persistence::{PersistenceError, PersistenceGateway};

/// Result of pushing a snapshot after a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SyncStatus {
    Saved,
    /// Nothing changed, nothing was written.
    Unchanged,
    Failed { message: String },
}

impl SyncStatus {
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

pub struct CatalogSession {
    store: RecordStore,
    gateway: Arc<dyn PersistenceGateway>,
    last_created_at: i64,
}

impl CatalogSession {
    /// Loads the snapshot once and starts a session over it.
    ///
    /// Records repeating an earlier id in the stored snapshot are dropped with a
    /// warning so a damaged snapshot cannot block startup.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`PersistenceError`] if the snapshot cannot be read.
    pub async fn open(gateway: Arc<dyn PersistenceGateway>) -> Result<Self, PersistenceError> {
        let loaded = gateway.load().await?;
        let loaded_count = loaded.len();

        let records = reconcile::merge(&[], loaded);
        if records.len() != loaded_count {
            warn!(
                store = gateway.store_key(),
                dropped = loaded_count - records.len(),
                "Snapshot contained duplicate ids, keeping first occurrences"
            );
        }

        let last_created_at = records.iter().map(|r| r.created_at).max().unwrap_or(0);
        let store = RecordStore::from_records(records)
            .map_err(|e| PersistenceError::Corrupt(e.to_string()))?;

        info!(
            store = gateway.store_key(),
            records = store.len(),
            "Catalog session opened"
        );

        Ok(Self {
            store,
            gateway,
            last_created_at,
        })
    }

    #[must_use]
    pub fn records(&self) -> &[MediaRecord] {
        self.store.all()
    }

    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&MediaRecord> {
        self.store.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[must_use]
    pub fn store_key(&self) -> &str {
        self.gateway.store_key()
    }

    #[must_use]
    pub fn view(&self, query: &QueryConfig) -> CatalogView {
        view::derive(self.store.all(), query)
    }

    #[must_use]
    pub fn counts(&self) -> CategoryCounts {
        view::category_counts(self.store.all())
    }

    #[must_use]
    pub fn genres(&self) -> Vec<String> {
        view::known_genres(self.store.all())
    }

    /// Full-record upsert keyed by id.
    pub async fn save_record(&mut self, record: MediaRecord) -> SyncStatus {
        self.store.upsert(record);
        self.persist().await
    }

    /// Creates a record with a fresh id and creation time.
    pub async fn create(&mut self, draft: RecordDraft) -> (MediaRecord, SyncStatus) {
        let created_at = self.next_created_at();
        let record = MediaRecord::from_draft(draft, RecordId::generate(), created_at);
        let status = self.save_record(record.clone()).await;
        (record, status)
    }

    /// Replaces an existing record with the edited draft.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no record has `id`.
    pub async fn revise(
        &mut self,
        id: &RecordId,
        draft: RecordDraft,
    ) -> Result<(MediaRecord, SyncStatus), CatalogError> {
        let revised = self
            .store
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?
            .revise(draft);

        let status = self.save_record(revised.clone()).await;
        Ok((revised, status))
    }

    /// Deletes by id; deleting an absent id is not an error.
    pub async fn delete(&mut self, id: &RecordId) -> (bool, SyncStatus) {
        if self.store.remove(id) {
            (true, self.persist().await)
        } else {
            (false, SyncStatus::Unchanged)
        }
    }

    /// Imports JSON text under `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] for a rejected payload; the store is unchanged.
    pub async fn import(
        &mut self,
        payload: &str,
        policy: MergePolicy,
    ) -> Result<(ImportSummary, SyncStatus), ImportError> {
        let (records, summary) = reconcile::import(self.store.all(), payload, policy)?;
        self.apply_import(records, summary).await
    }

    /// Imports an already-decoded JSON value under `policy`.
    ///
    /// # Errors
    ///
    /// See [`CatalogSession::import`].
    pub async fn import_value(
        &mut self,
        payload: Value,
        policy: MergePolicy,
    ) -> Result<(ImportSummary, SyncStatus), ImportError> {
        let (records, summary) = reconcile::import_value(self.store.all(), payload, policy)?;
        self.apply_import(records, summary).await
    }

    async fn apply_import(
        &mut self,
        records: Vec<MediaRecord>,
        summary: ImportSummary,
    ) -> Result<(ImportSummary, SyncStatus), ImportError> {
        let store = RecordStore::from_records(records).map_err(|e| match e {
            CatalogError::DuplicateId(id) => ImportError::DuplicateId(id),
            other => ImportError::MalformedRecord {
                index: 0,
                reason: other.to_string(),
            },
        })?;

        if let Some(newest) = store.all().iter().map(|r| r.created_at).max() {
            self.last_created_at = self.last_created_at.max(newest);
        }
        self.store = store;

        info!(
            policy = %summary.policy,
            added = summary.added,
            skipped = summary.skipped,
            total = summary.total,
            "Import applied"
        );

        Ok((summary, self.persist().await))
    }

    /// Pretty-printed snapshot for export files.
    ///
    /// # Errors
    ///
    /// Returns a serialization error; not expected for well-formed records.
    pub fn export(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self.store.all())
    }

    /// Pushes the full snapshot to the gateway.
    pub async fn persist(&self) -> SyncStatus {
        match self.gateway.save(self.store.all()).await {
            Ok(()) => SyncStatus::Saved,
            Err(e) => {
                warn!(
                    store = self.gateway.store_key(),
                    error = %e,
                    "Failed to persist catalog snapshot, keeping in-memory state"
                );
                SyncStatus::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Strictly increasing creation timestamps in epoch milliseconds.
    fn next_created_at(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let next = now.max(self.last_created_at + 1);
        self.last_created_at = next;
        next
    }
}
