mod add;
mod counts;
mod export;
mod import;
mod list;
mod remove;
mod serve;

pub use add::cmd_add_record;
pub use counts::cmd_counts;
pub use export::cmd_export;
pub use import::cmd_import;
pub use list::cmd_list_records;
pub use remove::cmd_remove_record;
pub use serve::cmd_serve;

use crate::catalog::SyncStatus;

/// Turns a failed save into an error so the process exits non-zero.
fn ensure_saved(sync: &SyncStatus) -> anyhow::Result<()> {
    match sync {
        SyncStatus::Failed { message } => {
            anyhow::bail!("Change applied but could not be saved: {message}")
        }
        SyncStatus::Saved | SyncStatus::Unchanged => Ok(()),
    }
}
