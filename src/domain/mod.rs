//! Domain types for the media catalog with strong typing.
//!
//! This module provides type-safe wrappers and closed enumerations for the
//! catalog. Record identity is a newtype over an opaque string so it cannot be
//! confused with titles or other free text.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unique identifier of a [`MediaRecord`](crate::models::record::MediaRecord).
///
/// Identifiers are opaque: records created locally get a UUID, imported records
/// keep whatever identifier the payload carried.
///
/// # Examples
///
/// ```rust
/// use oniscenary::domain::RecordId;
///
/// let id = RecordId::new("1700000000000");
/// assert_eq!(id.as_str(), "1700000000000");
/// assert_eq!(id.to_string(), "1700000000000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Longest identifier accepted from imports and request paths.
    pub const MAX_LEN: usize = 128;

    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id can be addressed by path: non-blank, no surrounding
    /// whitespace, at most [`RecordId::MAX_LEN`] bytes.
    #[must_use]
    pub fn is_addressable(&self) -> bool {
        !self.0.is_empty() && self.0.trim() == self.0 && self.0.len() <= Self::MAX_LEN
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Error returned when a label cannot be parsed into a domain enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
}

impl ParseLabelError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Media category. Closed set.
///
/// Snapshots carry the labels of the web client (`Anime`, `Movie`,
/// `Manga/Truyện Tranh`) so a snapshot survives a load/save through any peer
/// unchanged. Variant names are accepted on input too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Anime,
    #[serde(rename = "Movie", alias = "LiveAction")]
    LiveAction,
    #[serde(rename = "Manga/Truyện Tranh", alias = "Manga")]
    Manga,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::Anime, Self::LiveAction, Self::Manga];

    /// Label stored in snapshots.
    #[must_use]
    pub const fn snapshot_label(self) -> &'static str {
        match self {
            Self::Anime => "Anime",
            Self::LiveAction => "Movie",
            Self::Manga => "Manga/Truyện Tranh",
        }
    }

    /// Short label for filters, counts and terminal output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Anime => "Anime",
            Self::LiveAction => "Movie",
            Self::Manga => "Manga",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anime" => Ok(Self::Anime),
            "movie" | "liveaction" | "live-action" | "live_action" => Ok(Self::LiveAction),
            "manga" | "manga/truyện tranh" => Ok(Self::Manga),
            _ => Err(ParseLabelError::new("category", s)),
        }
    }
}

/// Personal watch status of a record.
///
/// Stored under the web client's Vietnamese labels; English variant names are
/// accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Đang xem", alias = "Watching")]
    Watching,
    #[serde(rename = "Hoàn thành", alias = "Completed")]
    Completed,
    #[default]
    #[serde(rename = "Dự định xem", alias = "PlanToWatch")]
    PlanToWatch,
    #[serde(rename = "Tạm dừng", alias = "OnHold")]
    OnHold,
    #[serde(rename = "Bỏ dở", alias = "Dropped")]
    Dropped,
}

impl Status {
    pub const ALL: [Self; 5] = [
        Self::Watching,
        Self::Completed,
        Self::PlanToWatch,
        Self::OnHold,
        Self::Dropped,
    ];

    /// Label stored in snapshots.
    #[must_use]
    pub const fn snapshot_label(self) -> &'static str {
        match self {
            Self::Watching => "Đang xem",
            Self::Completed => "Hoàn thành",
            Self::PlanToWatch => "Dự định xem",
            Self::OnHold => "Tạm dừng",
            Self::Dropped => "Bỏ dở",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Watching => "Watching",
            Self::Completed => "Completed",
            Self::PlanToWatch => "PlanToWatch",
            Self::OnHold => "OnHold",
            Self::Dropped => "Dropped",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "watching" => Ok(Self::Watching),
            "completed" => Ok(Self::Completed),
            "plantowatch" | "planned" => Ok(Self::PlanToWatch),
            "onhold" | "paused" => Ok(Self::OnHold),
            "dropped" => Ok(Self::Dropped),
            other => Self::ALL
                .into_iter()
                .find(|status| {
                    status.snapshot_label().replace(' ', "").to_lowercase() == other
                })
                .ok_or_else(|| ParseLabelError::new("status", s)),
        }
    }
}

/// Error returned for a rating outside `[0, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("rating {0} is outside the range 0..=10")]
pub struct RatingOutOfRange(pub f64);

/// Personal score in `[0, 10]`.
///
/// Half steps are the convention but any value in range is accepted.
///
/// ```rust
/// use oniscenary::domain::Rating;
///
/// assert!(Rating::new(9.5).is_ok());
/// assert!(Rating::new(10.5).is_err());
/// assert_eq!(Rating::clamped(-3.0).value(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
#[serde(try_from = "f64")]
pub struct Rating(f64);

impl Rating {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;

    /// # Errors
    ///
    /// Returns [`RatingOutOfRange`] for values outside `[0, 10]` and for NaN.
    pub fn new(value: f64) -> Result<Self, RatingOutOfRange> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingOutOfRange(value))
        }
    }

    /// Clamps into range; NaN becomes zero.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self(Self::MIN);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(8.0)
    }
}

impl TryFrom<f64> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Whole scores are written as integers (`9`, not `9.0`), the way the web
/// client writes them.
impl Serialize for Rating {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract() == 0.0 {
            serializer.serialize_u8(self.0 as u8)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{:.1}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_with_snapshot_labels() {
        assert_eq!(
            serde_json::to_string(&Category::LiveAction).unwrap(),
            "\"Movie\""
        );
        assert_eq!(
            serde_json::to_string(&Category::Manga).unwrap(),
            "\"Manga/Truyện Tranh\""
        );
    }

    #[test]
    fn category_accepts_legacy_labels() {
        let movie: Category = serde_json::from_str("\"LiveAction\"").unwrap();
        assert_eq!(movie, Category::LiveAction);

        let manga: Category = serde_json::from_str("\"Manga\"").unwrap();
        assert_eq!(manga, Category::Manga);
    }

    #[test]
    fn status_serializes_with_snapshot_labels() {
        for status in Status::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.snapshot_label()));
            assert_eq!(serde_json::from_str::<Status>(&json).unwrap(), status);
        }

        let english: Status = serde_json::from_str("\"PlanToWatch\"").unwrap();
        assert_eq!(english, Status::PlanToWatch);
        assert_eq!("Tạm dừng".parse::<Status>().unwrap(), Status::OnHold);
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!("movie".parse::<Category>().unwrap(), Category::LiveAction);
        assert_eq!("on-hold".parse::<Status>().unwrap(), Status::OnHold);
        assert_eq!("Plan To Watch".parse::<Status>().unwrap(), Status::PlanToWatch);
        assert!("cartoon".parse::<Category>().is_err());
    }

    #[test]
    fn rating_rejects_out_of_range_on_deserialize() {
        assert!(serde_json::from_str::<Rating>("7.5").is_ok());
        assert!(serde_json::from_str::<Rating>("11").is_err());
        assert!(serde_json::from_str::<Rating>("-1").is_err());
    }

    #[test]
    fn rating_serializes_whole_scores_as_integers() {
        assert_eq!(serde_json::to_string(&Rating::new(9.0).unwrap()).unwrap(), "9");
        assert_eq!(serde_json::to_string(&Rating::new(0.0).unwrap()).unwrap(), "0");
        assert_eq!(serde_json::to_string(&Rating::new(8.5).unwrap()).unwrap(), "8.5");
    }

    #[test]
    fn rating_display() {
        assert_eq!(Rating::new(9.0).unwrap().to_string(), "9");
        assert_eq!(Rating::new(7.5).unwrap().to_string(), "7.5");
    }

    #[test]
    fn record_id_round_trips_as_plain_string() {
        let id = RecordId::new("42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
        assert_ne!(RecordId::generate(), RecordId::generate());
    }

    #[test]
    fn record_id_addressability() {
        assert!(RecordId::new("7").is_addressable());
        assert!(RecordId::generate().is_addressable());
        assert!(!RecordId::new("").is_addressable());
        assert!(!RecordId::new(" 7").is_addressable());
        assert!(!RecordId::new("7\n").is_addressable());
        assert!(!RecordId::new("x".repeat(RecordId::MAX_LEN + 1)).is_addressable());
    }
}
