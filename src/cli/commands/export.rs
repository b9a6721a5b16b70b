use anyhow::Context;
use std::path::Path;

use crate::catalog::CatalogSession;

pub async fn cmd_export(session: &CatalogSession, path: &Path) -> anyhow::Result<()> {
    let body = session.export()?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    println!("✓ Exported {} records to {}", session.len(), path.display());
    Ok(())
}
