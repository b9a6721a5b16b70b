//! Durable storage of full record snapshots.
//!
//! Every save is a complete overwrite of the snapshot stored under the
//! gateway's key, so concurrent writers resolve as last-writer-wins.

pub mod file;
pub mod http;
pub mod memory;

pub use file::FileGateway;
pub use http::HttpGateway;
pub use memory::MemoryGateway;

use thiserror::Error;

use crate::models::record::MediaRecord;

/// Errors specific to snapshot persistence.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored snapshot is not a record array: {0}")]
    Corrupt(String),

    #[error("Remote store responded with {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for PersistenceError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Load/save of the full record set for one store key.
///
/// # Examples
///
/// ```rust,ignore
/// use oniscenary::persistence::{PersistenceGateway, PersistenceError};
/// use std::sync::Arc;
///
/// async fn example(gateway: Arc<dyn PersistenceGateway>) -> Result<(), PersistenceError> {
///     let records = gateway.load().await?;
///     gateway.save(&records).await
/// }
/// ```
#[async_trait::async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Opaque identifier of the snapshot this gateway reads and writes.
    fn store_key(&self) -> &str;

    /// Loads the stored snapshot; an empty set when nothing was stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Corrupt`] if the stored data is not a record
    /// array, or an I/O / transport error.
    async fn load(&self) -> Result<Vec<MediaRecord>, PersistenceError>;

    /// Overwrites the stored snapshot with `records`.
    ///
    /// # Errors
    ///
    /// Returns an I/O or transport error; the caller's in-memory state is
    /// unaffected.
    async fn save(&self, records: &[MediaRecord]) -> Result<(), PersistenceError>;
}
