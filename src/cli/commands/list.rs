//! List records command handler

use crate::catalog::{CatalogSession, PageLink, QueryConfig, ViewMode};
use crate::models::record::MediaRecord;

pub fn cmd_list_records(session: &CatalogSession, query: &QueryConfig) -> anyhow::Result<()> {
    if session.is_empty() {
        println!("The catalog is empty.");
        println!();
        println!("Add a record with: oniscenary add \"title\"");
        return Ok(());
    }

    let view = session.view(query);

    if view.total_matches == 0 {
        println!("No records match the current filters.");
        return Ok(());
    }

    if view.items.is_empty() {
        println!(
            "Page {} is out of range ({} pages).",
            view.page, view.total_pages
        );
        return Ok(());
    }

    println!(
        "{} records ({} matching) | mode: {} | page {}/{}",
        view.counts.total, view.total_matches, query.mode, view.page, view.total_pages
    );
    println!("{:-<70}", "");

    for record in &view.items {
        print_record(record, query.mode);
    }

    if view.pages.len() > 1 {
        let links: Vec<String> = view
            .pages
            .iter()
            .map(|link| match link {
                PageLink::Page(p) if *p == view.page => format!("[{p}]"),
                PageLink::Page(p) => p.to_string(),
                PageLink::Gap => "...".to_string(),
            })
            .collect();
        println!();
        println!("Pages: {}", links.join(" "));
    }

    Ok(())
}

fn print_record(record: &MediaRecord, mode: ViewMode) {
    let rank = match (mode, record.manual_rank) {
        (ViewMode::All, Some(rank)) => format!("#{rank} "),
        _ => String::new(),
    };

    println!(
        "{}{} [{}] ★ {}",
        rank,
        record.title,
        record.category.label(),
        record.rating
    );
    println!("  ID: {} | Status: {}", record.id, record.status.label());
    if !record.genres.is_empty() {
        println!("  Genres: {}", record.genres.join(", "));
    }
}
