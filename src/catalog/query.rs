//! Query configuration: the immutable snapshot of what the user is looking at.
//!
//! A [`QueryConfig`] is rebuilt on every interaction through the `with_*`
//! transitions, which also apply the navigation resets (new search, category or
//! mode goes back to page 1).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::{Category, ParseLabelError};

/// Sort mode of the catalog view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Manual rank first, then newest first.
    #[default]
    All,
    /// Highest rating first.
    Ranking,
    /// Newest first.
    History,
}

impl ViewMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Ranking => "ranking",
            Self::History => "history",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" | "default" => Ok(Self::All),
            "ranking" | "rank" | "top" => Ok(Self::Ranking),
            "history" | "recent" => Ok(Self::History),
            other => Err(format!("unknown view mode: '{other}'")),
        }
    }
}

/// Category restriction. `All` keeps every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    #[must_use]
    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed.parse().map(Self::Only)
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = ParseLabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => "All".to_string(),
            CategoryFilter::Only(category) => category.label().to_string(),
        }
    }
}

/// Genre restriction, compared case-insensitively after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GenreFilter {
    #[default]
    All,
    Only(String),
}

impl GenreFilter {
    #[must_use]
    pub fn new(genre: &str) -> Self {
        let trimmed = genre.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(trimmed.to_string())
        }
    }
}

impl From<String> for GenreFilter {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<GenreFilter> for String {
    fn from(filter: GenreFilter) -> Self {
        match filter {
            GenreFilter::All => "All".to_string(),
            GenreFilter::Only(genre) => genre,
        }
    }
}

/// Snapshot of {search, category, genre, mode, page}.
///
/// `page` is 1-based. Deserializes straight from a URL query string where every
/// field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub search: String,
    pub category: CategoryFilter,
    pub genre: GenreFilter,
    pub mode: ViewMode,
    pub page: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: CategoryFilter::All,
            genre: GenreFilter::All,
            mode: ViewMode::All,
            page: 1,
        }
    }
}

impl QueryConfig {
    #[must_use]
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            genre: genre_for(self.category, self.genre),
            page: 1,
            ..self
        }
    }

    /// Switching category clears the genre filter unless the new category is
    /// movies, the only category with genre chips.
    #[must_use]
    pub fn with_category(self, category: CategoryFilter) -> Self {
        Self {
            category,
            genre: genre_for(category, self.genre),
            page: 1,
            ..self
        }
    }

    #[must_use]
    pub fn with_genre(self, genre: GenreFilter) -> Self {
        Self {
            genre,
            page: 1,
            ..self
        }
    }

    #[must_use]
    pub fn with_mode(self, mode: ViewMode) -> Self {
        Self {
            mode,
            genre: genre_for(self.category, self.genre),
            page: 1,
            ..self
        }
    }

    #[must_use]
    pub fn with_page(self, page: usize) -> Self {
        Self { page, ..self }
    }

    /// True when any of search, category or genre narrows the result.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty()
            || self.category != CategoryFilter::All
            || self.genre != GenreFilter::All
    }
}

/// Genre chips only exist for movies; every other category drops the filter.
fn genre_for(category: CategoryFilter, genre: GenreFilter) -> GenreFilter {
    match category {
        CategoryFilter::Only(Category::LiveAction) => genre,
        _ => GenreFilter::All,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_reset_page() {
        let query = QueryConfig::default().with_page(4);
        assert_eq!(query.clone().with_search("fri").page, 1);
        assert_eq!(query.clone().with_mode(ViewMode::Ranking).page, 1);
        assert_eq!(query.clone().with_genre(GenreFilter::new("Horror")).page, 1);
        assert_eq!(query.with_page(2).page, 2);
    }

    #[test]
    fn leaving_movies_clears_genre() {
        let query = QueryConfig::default()
            .with_category(CategoryFilter::Only(Category::LiveAction))
            .with_genre(GenreFilter::new("Horror"));
        assert_eq!(query.genre, GenreFilter::Only("Horror".to_string()));

        let query = query.with_category(CategoryFilter::Only(Category::Anime));
        assert_eq!(query.genre, GenreFilter::All);
    }

    #[test]
    fn search_and_mode_drop_genre_outside_movies() {
        let stray = QueryConfig::default().with_genre(GenreFilter::new("Horror"));
        assert_eq!(stray.clone().with_search("x").genre, GenreFilter::All);
        assert_eq!(stray.with_mode(ViewMode::Ranking).genre, GenreFilter::All);

        let movies = QueryConfig::default()
            .with_category(CategoryFilter::Only(Category::LiveAction))
            .with_genre(GenreFilter::new("Horror"));
        let horror = GenreFilter::Only("Horror".to_string());
        assert_eq!(movies.clone().with_search("x").genre, horror);
        assert_eq!(movies.with_mode(ViewMode::History).genre, horror);
    }

    #[test]
    fn deserializes_from_url_query() {
        let query: QueryConfig =
            serde_json::from_str(r#"{"category":"Movie","genre":" horror ","mode":"ranking","page":2}"#)
                .unwrap();

        assert_eq!(query.category, CategoryFilter::Only(Category::LiveAction));
        assert_eq!(query.genre, GenreFilter::Only("horror".to_string()));
        assert_eq!(query.mode, ViewMode::Ranking);
        assert_eq!(query.page, 2);
        assert!(query.search.is_empty());
    }

    #[test]
    fn all_labels_parse_to_unfiltered() {
        assert_eq!("All".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(GenreFilter::new("all"), GenreFilter::All);
        assert!(!QueryConfig::default().is_filtered());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!("settings".parse::<ViewMode>().is_err());
        assert_eq!("History".parse::<ViewMode>().unwrap(), ViewMode::History);
    }
}
