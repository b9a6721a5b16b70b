//! View engine: pure derivation of a displayable page from the record set and
//! a [`QueryConfig`].
//!
//! The pipeline is filter → sort → paginate, recomputed from scratch on every
//! call. Category counts are always taken over the unfiltered record set.

use serde::Serialize;
use std::cmp::Ordering;

use super::query::{GenreFilter, QueryConfig, ViewMode};
use crate::domain::Category;
use crate::models::record::MediaRecord;

/// Records per page.
pub const PAGE_SIZE: usize = 12;

/// Genres offered as quick picks by the editor.
pub const SUGGESTED_GENRES: &[&str] = &["Horror", "Sci-Fi", "Superhero", "Action", "Romance", "Comedy"];

/// Number of pages at or below which the pager lists every page.
const COMPACT_PAGER_LIMIT: usize = 5;

/// One page of the catalog plus what the filter affordances need.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub items: Vec<MediaRecord>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_matches: usize,
    pub pages: Vec<PageLink>,
    pub counts: CategoryCounts,
}

/// Live per-category counts over the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    #[serde(rename = "All")]
    pub total: usize,
    #[serde(rename = "Anime")]
    pub anime: usize,
    #[serde(rename = "Movie")]
    pub live_action: usize,
    #[serde(rename = "Manga")]
    pub manga: usize,
}

impl CategoryCounts {
    #[must_use]
    pub const fn get(&self, category: Category) -> usize {
        match category {
            Category::Anime => self.anime,
            Category::LiveAction => self.live_action,
            Category::Manga => self.manga,
        }
    }
}

/// Entry of the pager affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLink {
    Page(usize),
    Gap,
}

/// Runs the full pipeline for one query.
#[must_use]
pub fn derive(records: &[MediaRecord], query: &QueryConfig) -> CatalogView {
    let ordered = filter_and_sort(records, query);
    let total_matches = ordered.len();
    let total_pages = total_pages(total_matches);

    CatalogView {
        items: paginate(&ordered, query.page)
            .iter()
            .map(|record| (*record).clone())
            .collect(),
        page: query.page,
        page_size: PAGE_SIZE,
        total_pages,
        total_matches,
        pages: page_window(query.page, total_pages),
        counts: category_counts(records),
    }
}

/// Filtered records in display order, before pagination.
#[must_use]
pub fn filter_and_sort<'a>(records: &'a [MediaRecord], query: &QueryConfig) -> Vec<&'a MediaRecord> {
    let mut matched = filter(records, query);
    sort(&mut matched, query.mode);
    matched
}

/// Keeps records matching search, category and genre. Storage order is kept.
#[must_use]
pub fn filter<'a>(records: &'a [MediaRecord], query: &QueryConfig) -> Vec<&'a MediaRecord> {
    let needle = query.search.to_lowercase();

    records
        .iter()
        .filter(|record| needle.is_empty() || record.title.to_lowercase().contains(&needle))
        .filter(|record| query.category.matches(record.category))
        .filter(|record| match &query.genre {
            GenreFilter::All => true,
            GenreFilter::Only(genre) => record.has_genre(genre),
        })
        .collect()
}

/// Stable sort by the given mode.
pub fn sort(records: &mut [&MediaRecord], mode: ViewMode) {
    match mode {
        ViewMode::Ranking => records.sort_by(|a, b| b.rating.value().total_cmp(&a.rating.value())),
        ViewMode::History => records.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        ViewMode::All => records.sort_by(|a, b| {
            compare_rank(a.manual_rank, b.manual_rank).then_with(|| b.created_at.cmp(&a.created_at))
        }),
    }
}

/// Absent rank sorts after every present rank.
fn compare_rank(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[must_use]
pub const fn total_pages(total_matches: usize) -> usize {
    total_matches.div_ceil(PAGE_SIZE)
}

/// Slice for a 1-based page. Out-of-range pages are empty.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize) -> &[T] {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|index| index.checked_mul(PAGE_SIZE))
    else {
        return &[];
    };

    if start >= items.len() {
        return &[];
    }

    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// Clamps a requested page into `[1, total_pages]`; yields 1 for an empty result.
#[must_use]
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}

/// Counts per category plus the grand total.
#[must_use]
pub fn category_counts(records: &[MediaRecord]) -> CategoryCounts {
    records
        .iter()
        .fold(CategoryCounts::default(), |mut counts, record| {
            counts.total += 1;
            match record.category {
                Category::Anime => counts.anime += 1,
                Category::LiveAction => counts.live_action += 1,
                Category::Manga => counts.manga += 1,
            }
            counts
        })
}

/// Pager entries for `current` out of `total` pages.
///
/// Up to five pages are all listed. Beyond that the first page, the last page
/// and the neighbours of `current` are listed, with a gap marker two steps
/// away from `current` on each side.
///
/// ```rust
/// use oniscenary::catalog::view::{page_window, PageLink::{Gap, Page}};
///
/// assert_eq!(page_window(5, 9), vec![Page(1), Gap, Page(4), Page(5), Page(6), Gap, Page(9)]);
/// assert!(page_window(1, 1).is_empty());
/// ```
#[must_use]
pub fn page_window(current: usize, total: usize) -> Vec<PageLink> {
    if total <= 1 {
        return Vec::new();
    }

    (1..=total)
        .filter_map(|page| {
            let is_edge = page == 1 || page == total;
            if total <= COMPACT_PAGER_LIMIT || is_edge || page.abs_diff(current) <= 1 {
                Some(PageLink::Page(page))
            } else if page.abs_diff(current) == 2 {
                Some(PageLink::Gap)
            } else {
                None
            }
        })
        .collect()
}

/// Distinct genres across the store for the genre filter.
///
/// Spellings are compared case-insensitively after trimming; the first
/// spelling seen wins. Sorted case-insensitively.
#[must_use]
pub fn known_genres(records: &[MediaRecord]) -> Vec<String> {
    let mut genres: Vec<(String, String)> = Vec::new();

    for genre in records.iter().flat_map(|record| record.genres.iter()) {
        let display = genre.trim();
        if display.is_empty() {
            continue;
        }
        let key = display.to_lowercase();
        if !genres.iter().any(|(existing, _)| *existing == key) {
            genres.push((key, display.to_string()));
        }
    }

    genres.sort_by(|a, b| a.0.cmp(&b.0));
    genres.into_iter().map(|(_, display)| display).collect()
}
