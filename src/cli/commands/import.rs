//! Import command handler

use anyhow::Context;
use std::path::Path;

use crate::catalog::{CatalogSession, MergePolicy};

use super::ensure_saved;

pub async fn cmd_import(
    session: &mut CatalogSession,
    path: &Path,
    policy: MergePolicy,
) -> anyhow::Result<()> {
    let payload = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;

    let (summary, sync) = session
        .import(&payload, policy)
        .await
        .with_context(|| format!("Rejected import file: {}", path.display()))?;

    match policy {
        MergePolicy::Merge => println!(
            "✓ Merged {} new records ({} already present). Catalog now has {}.",
            summary.added, summary.skipped, summary.total
        ),
        MergePolicy::Replace => println!(
            "✓ Replaced the catalog with {} records.",
            summary.total
        ),
    }

    ensure_saved(&sync)
}
