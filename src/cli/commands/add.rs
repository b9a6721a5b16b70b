use crate::catalog::CatalogSession;
use crate::models::record::RecordDraft;

use super::ensure_saved;

pub async fn cmd_add_record(session: &mut CatalogSession, draft: RecordDraft) -> anyhow::Result<()> {
    let (record, sync) = session.create(draft).await;

    println!("✓ Added: {} [{}]", record.title, record.category.label());
    println!("  ID: {}", record.id);

    ensure_saved(&sync)
}
