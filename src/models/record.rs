use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::CatalogError;
use crate::domain::{Category, Rating, RecordId, Status};

/// One cataloged media entry.
///
/// Field names and order follow the web client's snapshot format, so a
/// snapshot loaded and saved again comes out unchanged. The playback link and
/// manual rank are stored as `movieUrl` and `topOrder`; `playbackUrl` and
/// `manualRank` are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub id: RecordId,
    pub title: String,
    pub category: Category,
    pub status: Status,
    pub rating: Rating,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(
        default,
        rename = "movieUrl",
        alias = "playbackUrl",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub playback_url: Option<String>,
    #[serde(
        default,
        rename = "topOrder",
        alias = "manualRank",
        deserialize_with = "zero_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub manual_rank: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Milliseconds since the Unix epoch. Never changes after creation.
    pub created_at: i64,
}

impl MediaRecord {
    /// Builds a brand-new record from editor input.
    #[must_use]
    pub fn from_draft(draft: RecordDraft, id: RecordId, created_at: i64) -> Self {
        let RecordDraft {
            title,
            category,
            status,
            rating,
            description,
            image_url,
            playback_url,
            manual_rank,
            genres,
        } = draft;

        Self {
            id,
            title: normalize_title(&title),
            category,
            status,
            rating: rating.map_or_else(Rating::default, Rating::clamped),
            description,
            image_url,
            playback_url: playback_url.filter(|url| !url.trim().is_empty()),
            manual_rank: manual_rank.filter(|rank| *rank > 0),
            genres: normalize_genres(genres),
            created_at,
        }
    }

    /// Full-record replacement produced by editing. Identity and creation time
    /// are carried over from `self`.
    #[must_use]
    pub fn revise(&self, draft: RecordDraft) -> Self {
        Self::from_draft(draft, self.id.clone(), self.created_at)
    }

    /// Checks the invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidRecord`] for a blank title or an id that
    /// is blank, padded with whitespace, or longer than [`RecordId::MAX_LEN`].
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.id.as_str().trim().is_empty() {
            return Err(CatalogError::InvalidRecord("id must not be empty".to_string()));
        }
        if !self.id.is_addressable() {
            return Err(CatalogError::InvalidRecord(format!(
                "id {:?} must have no surrounding whitespace and at most {} characters",
                self.id.as_str(),
                RecordId::MAX_LEN
            )));
        }
        if self.title.trim().is_empty() {
            return Err(CatalogError::InvalidRecord(format!(
                "record {} has an empty title",
                self.id
            )));
        }
        Ok(())
    }

    /// Case-insensitive, whitespace-trimmed genre membership.
    #[must_use]
    pub fn has_genre(&self, genre: &str) -> bool {
        let wanted = genre.trim().to_lowercase();
        self.genres
            .iter()
            .any(|g| g.trim().to_lowercase() == wanted)
    }
}

/// Editor input for creating or revising a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordDraft {
    pub title: String,
    pub category: Category,
    pub status: Status,
    pub rating: Option<f64>,
    pub description: String,
    pub image_url: String,
    #[serde(alias = "movieUrl")]
    pub playback_url: Option<String>,
    #[serde(alias = "topOrder")]
    pub manual_rank: Option<u32>,
    pub genres: Vec<String>,
}

impl RecordDraft {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

impl From<&MediaRecord> for RecordDraft {
    fn from(record: &MediaRecord) -> Self {
        Self {
            title: record.title.clone(),
            category: record.category,
            status: record.status,
            rating: Some(record.rating.value()),
            description: record.description.clone(),
            image_url: record.image_url.clone(),
            playback_url: record.playback_url.clone(),
            manual_rank: record.manual_rank,
            genres: record.genres.clone(),
        }
    }
}

pub const UNTITLED: &str = "Untitled";

fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Splits comma-separated genre input, as typed into the editor.
///
/// ```rust
/// use oniscenary::models::record::parse_genre_list;
///
/// assert_eq!(parse_genre_list(" Action, ,Romance,action "), vec!["Action", "Romance"]);
/// ```
#[must_use]
pub fn parse_genre_list(input: &str) -> Vec<String> {
    normalize_genres(input.split(',').map(str::to_string).collect())
}

fn normalize_genres(genres: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(genres.len());
    let mut result = Vec::with_capacity(genres.len());

    for genre in genres {
        let trimmed = genre.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        result.push(trimmed.to_string());
    }

    result
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|url| !url.trim().is_empty()))
}

fn zero_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<u32>::deserialize(deserializer)?;
    Ok(value.filter(|rank| *rank > 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_legacy_snapshot_entry() {
        let value = json!({
            "id": "1712345678901",
            "title": "Frieren",
            "category": "Anime",
            "status": "Hoàn thành",
            "rating": 9.5,
            "description": "",
            "imageUrl": "data:image/png;base64,AAAA",
            "movieUrl": "",
            "topOrder": 2,
            "genres": ["Fantasy"],
            "createdAt": 1712345678901_i64
        });

        let record: MediaRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.status, Status::Completed);
        assert_eq!(record.playback_url, None);
        assert_eq!(record.manual_rank, Some(2));
        assert_eq!(record.created_at, 1_712_345_678_901);
    }

    #[test]
    fn optional_fields_default_when_missing() {
        let value = json!({
            "id": "a",
            "title": "Dune",
            "category": "Movie",
            "status": "Watching",
            "rating": 7,
            "createdAt": 5
        });

        let record: MediaRecord = serde_json::from_value(value).unwrap();
        assert!(record.genres.is_empty());
        assert!(record.description.is_empty());
        assert_eq!(record.manual_rank, None);
        assert_eq!(record.category, Category::LiveAction);
    }

    #[test]
    fn serializes_with_camel_case_and_skips_absent_options() {
        let record = MediaRecord::from_draft(RecordDraft::titled("Akira"), RecordId::new("x"), 10);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["imageUrl"], json!(""));
        assert_eq!(value["createdAt"], json!(10));
        assert!(value.get("movieUrl").is_none());
        assert!(value.get("topOrder").is_none());
    }

    #[test]
    fn accepts_descriptive_field_names() {
        let value = json!({
            "id": "b",
            "title": "Paprika",
            "category": "Movie",
            "status": "Completed",
            "rating": 8,
            "playbackUrl": "https://example.com/paprika",
            "manualRank": 3,
            "createdAt": 6
        });

        let record: MediaRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.playback_url.as_deref(), Some("https://example.com/paprika"));
        assert_eq!(record.manual_rank, Some(3));

        let written = serde_json::to_value(&record).unwrap();
        assert_eq!(written["movieUrl"], "https://example.com/paprika");
        assert_eq!(written["topOrder"], 3);
        assert_eq!(written["status"], "Hoàn thành");
    }

    #[test]
    fn web_client_snapshot_round_trips_unchanged() {
        let snapshot = r#"[
  {
    "id": "1712345678901",
    "title": "Frieren",
    "category": "Anime",
    "status": "Hoàn thành",
    "rating": 9.5,
    "description": "After the party",
    "imageUrl": "https://example.com/frieren.jpg",
    "genres": [
      "Fantasy"
    ],
    "createdAt": 1712345678901
  },
  {
    "id": "1712345678902",
    "title": "Alien",
    "category": "Movie",
    "status": "Dự định xem",
    "rating": 8,
    "description": "",
    "imageUrl": "",
    "movieUrl": "https://example.com/alien",
    "topOrder": 1,
    "genres": [
      "Horror",
      "Sci-Fi"
    ],
    "createdAt": 1712345678902
  },
  {
    "id": "1712345678903",
    "title": "Berserk",
    "category": "Manga/Truyện Tranh",
    "status": "Tạm dừng",
    "rating": 10,
    "description": "",
    "imageUrl": "",
    "genres": [],
    "createdAt": 1712345678903
  },
  {
    "id": "1712345678904",
    "title": "Dorohedoro",
    "category": "Anime",
    "status": "Bỏ dở",
    "rating": 6,
    "description": "",
    "imageUrl": "",
    "genres": [],
    "createdAt": 1712345678904
  },
  {
    "id": "1712345678905",
    "title": "Mushishi",
    "category": "Anime",
    "status": "Đang xem",
    "rating": 9,
    "description": "",
    "imageUrl": "",
    "genres": [],
    "createdAt": 1712345678905
  }
]"#;

        let records: Vec<MediaRecord> = serde_json::from_str(snapshot).unwrap();
        assert_eq!(records[2].category, Category::Manga);
        assert_eq!(serde_json::to_string_pretty(&records).unwrap(), snapshot);
    }

    #[test]
    fn draft_defaults_follow_editor_conventions() {
        let draft = RecordDraft {
            title: "   ".to_string(),
            rating: Some(12.0),
            playback_url: Some(" ".to_string()),
            manual_rank: Some(0),
            genres: vec!["Horror".into(), "horror ".into(), String::new()],
            ..RecordDraft::default()
        };

        let record = MediaRecord::from_draft(draft, RecordId::new("1"), 1);
        assert_eq!(record.title, UNTITLED);
        assert_eq!(record.rating.value(), 10.0);
        assert_eq!(record.playback_url, None);
        assert_eq!(record.manual_rank, None);
        assert_eq!(record.genres, vec!["Horror"]);
    }

    #[test]
    fn revise_keeps_identity_and_creation_time() {
        let original =
            MediaRecord::from_draft(RecordDraft::titled("Old"), RecordId::new("keep"), 99);
        let revised = original.revise(RecordDraft::titled("New"));

        assert_eq!(revised.id, original.id);
        assert_eq!(revised.created_at, 99);
        assert_eq!(revised.title, "New");
    }

    #[test]
    fn genre_match_ignores_case_and_padding() {
        let mut record = MediaRecord::from_draft(RecordDraft::titled("X"), RecordId::new("1"), 1);
        record.genres = vec![" Sci-Fi ".to_string()];

        assert!(record.has_genre("sci-fi"));
        assert!(record.has_genre("  SCI-FI"));
        assert!(!record.has_genre("sci"));
    }

    #[test]
    fn validate_rejects_unaddressable_ids() {
        for id in [" 7".to_string(), "7 ".to_string(), "x".repeat(RecordId::MAX_LEN + 1)] {
            let record =
                MediaRecord::from_draft(RecordDraft::titled("X"), RecordId::new(id.clone()), 1);
            assert!(record.validate().is_err(), "id {id:?} should be rejected");
        }

        let record = MediaRecord::from_draft(RecordDraft::titled("X"), RecordId::new("7"), 1);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_title() {
        let mut record = MediaRecord::from_draft(RecordDraft::titled("X"), RecordId::new("1"), 1);
        record.title = " ".to_string();
        assert!(record.validate().is_err());
    }
}
