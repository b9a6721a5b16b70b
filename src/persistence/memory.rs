use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{PersistenceError, PersistenceGateway};
use crate::models::record::MediaRecord;

type Snapshots = Arc<Mutex<HashMap<String, Vec<MediaRecord>>>>;

/// In-process keyed snapshot store.
///
/// Clones share the same backing map, so two gateways cloned from one another
/// behave like two sessions writing to the same remote key.
#[derive(Debug, Clone)]
pub struct MemoryGateway {
    key: String,
    snapshots: Snapshots,
    fail_saves: Arc<AtomicBool>,
}

impl MemoryGateway {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            snapshots: Arc::default(),
            fail_saves: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A gateway for `key` sharing this gateway's backing map.
    #[must_use]
    pub fn for_key(&self, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            snapshots: Arc::clone(&self.snapshots),
            fail_saves: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes subsequent saves fail until switched back.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// What is currently stored for this gateway's key.
    #[must_use]
    pub fn stored(&self) -> Option<Vec<MediaRecord>> {
        self.lock().get(&self.key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<MediaRecord>>> {
        self.snapshots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl PersistenceGateway for MemoryGateway {
    fn store_key(&self) -> &str {
        &self.key
    }

    async fn load(&self) -> Result<Vec<MediaRecord>, PersistenceError> {
        Ok(self.lock().get(&self.key).cloned().unwrap_or_default())
    }

    async fn save(&self, records: &[MediaRecord]) -> Result<(), PersistenceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistenceError::Io(std::io::Error::other(
                "memory gateway configured to fail",
            )));
        }
        self.lock().insert(self.key.clone(), records.to_vec());
        Ok(())
    }
}
