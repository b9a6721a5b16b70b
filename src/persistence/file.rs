use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::{PersistenceError, PersistenceGateway};
use crate::models::record::MediaRecord;

/// Snapshot stored as a pretty-printed JSON array in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileGateway {
    dir: PathBuf,
    key: String,
}

impl FileGateway {
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            key: key.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    async fn write_atomically(&self, path: &Path, content: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir).await?;

        let tmp_path = self.dir.join(format!(".{}.json.tmp", self.key));
        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, path).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl PersistenceGateway for FileGateway {
    fn store_key(&self) -> &str {
        &self.key
    }

    async fn load(&self) -> Result<Vec<MediaRecord>, PersistenceError> {
        let path = self.path();

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No snapshot at {}, starting empty", path.display());
                self.write_atomically(&path, "[]").await?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let records: Vec<MediaRecord> = serde_json::from_str(&content)
            .map_err(|e| PersistenceError::Corrupt(format!("{}: {e}", path.display())))?;

        debug!(count = records.len(), "Loaded snapshot from {}", path.display());
        Ok(records)
    }

    async fn save(&self, records: &[MediaRecord]) -> Result<(), PersistenceError> {
        let path = self.path();
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| PersistenceError::Corrupt(e.to_string()))?;

        self.write_atomically(&path, &content).await?;
        debug!(count = records.len(), "Saved snapshot to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordId;
    use crate::models::record::RecordDraft;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("oniscenary-file-gateway-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn first_load_creates_empty_snapshot() {
        let dir = temp_dir();
        let gateway = FileGateway::new(&dir, "catalog");

        let records = gateway.load().await.unwrap();
        assert!(records.is_empty());

        let on_disk = std::fs::read_to_string(gateway.path()).unwrap();
        assert_eq!(on_disk, "[]");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn save_then_load_returns_same_records() {
        let dir = temp_dir();
        let gateway = FileGateway::new(&dir, "catalog");
        let records = vec![
            MediaRecord::from_draft(RecordDraft::titled("One"), RecordId::new("1"), 1),
            MediaRecord::from_draft(RecordDraft::titled("Two"), RecordId::new("2"), 2),
        ];

        gateway.save(&records).await.unwrap();
        assert_eq!(gateway.load().await.unwrap(), records);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_reported() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let gateway = FileGateway::new(&dir, "catalog");
        std::fs::write(gateway.path(), r#"{"not":"an array"}"#).unwrap();

        let err = gateway.load().await.unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt(_)));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn keys_are_isolated() {
        let dir = temp_dir();
        let first = FileGateway::new(&dir, "first");
        let second = FileGateway::new(&dir, "second");

        first
            .save(&[MediaRecord::from_draft(
                RecordDraft::titled("Only here"),
                RecordId::new("1"),
                1,
            )])
            .await
            .unwrap();

        assert_eq!(first.load().await.unwrap().len(), 1);
        assert!(second.load().await.unwrap().is_empty());

        let _ = std::fs::remove_dir_all(dir);
    }
}
