//! Catalog view and reconciliation engine.
//!
//! - [`store`]: canonical record collection and identity invariants
//! - [`query`]: the query configuration snapshot
//! - [`view`]: filter, sort, paginate and count
//! - [`reconcile`]: merge/replace of imported record sets
//! - [`session`]: owned context tying a store to a persistence gateway

mod error;
pub mod query;
pub mod reconcile;
pub mod session;
pub mod store;
pub mod view;

pub use error::{CatalogError, ImportError};
pub use query::{CategoryFilter, GenreFilter, QueryConfig, ViewMode};
pub use reconcile::{ImportSummary, MergePolicy};
pub use session::{CatalogSession, SyncStatus};
pub use store::RecordStore;
pub use view::{CatalogView, CategoryCounts, PAGE_SIZE, PageLink};
