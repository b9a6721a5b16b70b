use crate::catalog::CatalogSession;
use crate::domain::Category;

pub fn cmd_counts(session: &CatalogSession) -> anyhow::Result<()> {
    let counts = session.counts();

    println!("All: {}", counts.total);
    for category in Category::ALL {
        println!("{}: {}", category.label(), counts.get(category));
    }

    Ok(())
}
