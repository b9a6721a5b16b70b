use crate::catalog::CatalogSession;
use crate::domain::RecordId;

use super::ensure_saved;

pub async fn cmd_remove_record(session: &mut CatalogSession, id_str: &str) -> anyhow::Result<()> {
    let id = RecordId::new(id_str);

    let Some(title) = session.get(&id).map(|r| r.title.clone()) else {
        println!("Record with ID {id} not found.");
        println!("Use 'oniscenary list' to see record IDs.");
        return Ok(());
    };

    let (_, sync) = session.delete(&id).await;
    println!("✓ Removed: {title}");

    ensure_saved(&sync)
}
