//! Note module - the persisted unit of the note server

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Unique identifier for a note
///
/// Derived from the creation time (`YYYYMMDD_HHMMSS_mmm`, UTC). When two
/// notes are created within the same millisecond the store appends a
/// numeric suffix (`_1`, `_2`, ...). Ids name files on disk, so only ASCII
/// alphanumerics, `_` and `-` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteId(String);

impl NoteId {
    /// Maximum accepted id length
    pub const MAX_LEN: usize = 64;

    /// Build the base id for a creation timestamp
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use scrivener_domain::NoteId;
    ///
    /// let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
    /// assert_eq!(NoteId::from_timestamp(at).as_str(), "20240309_140507_000");
    /// ```
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(at.format("%Y%m%d_%H%M%S_%3f").to_string())
    }

    /// Derive a disambiguated id from this one
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}_{}", self.0, n))
    }

    /// Parse a caller-supplied id
    ///
    /// # Errors
    /// Returns error if the id is empty, too long, or contains characters
    /// that are not safe in a file name
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.is_empty() {
            return Err("Note id cannot be empty".to_string());
        }
        if s.len() > Self::MAX_LEN {
            return Err(format!("Note id exceeds {} characters", Self::MAX_LEN));
        }
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(format!("Note id contains invalid character '{}'", c));
        }
        Ok(Self(s.to_string()))
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Timestamp base and numeric suffix, when the id has that shape
    fn split_suffix(&self) -> (&str, Option<u32>) {
        match self.0.rsplit_once('_') {
            Some((base, n)) if base.len() == TIMESTAMP_ID_LEN => match n.parse() {
                Ok(n) => (base, Some(n)),
                Err(_) => (self.0.as_str(), None),
            },
            _ => (self.0.as_str(), None),
        }
    }
}

/// Length of `YYYYMMDD_HHMMSS_mmm`
const TIMESTAMP_ID_LEN: usize = 19;

/// Suffixed ids order numerically after their base (`_9` before `_10`)
impl Ord for NoteId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.split_suffix()
            .cmp(&other.split_suffix())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for NoteId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for NoteId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NoteId> for String {
    fn from(id: NoteId) -> Self {
        id.0
    }
}

/// A note - title, content and tags with lifecycle timestamps
///
/// Invariant: `created_at <= updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier, immutable after creation
    pub id: NoteId,

    /// Title (never empty)
    pub title: String,

    /// Body text (may be empty)
    pub content: String,

    /// Ordered, duplicate-free tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// True when the tags were assigned by the classifier
    #[serde(default)]
    pub auto_tagged: bool,

    /// Creation time, set once
    pub created_at: DateTime<Utc>,

    /// Time of the last mutation
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Check the record invariants
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title cannot be empty".to_string());
        }
        if self.created_at > self.updated_at {
            return Err(format!(
                "created_at ({}) is later than updated_at ({})",
                self.created_at, self.updated_at
            ));
        }
        Ok(())
    }

    /// Timestamp for the next mutation of this note
    ///
    /// Always strictly later than the current `updated_at`, even when the
    /// clock has not advanced.
    pub fn next_update_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::milliseconds(1)
        }
    }

    /// Case-insensitive substring match over title, content and tags
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.content.to_lowercase().contains(&query)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&query))
    }

    /// Case-insensitive exact tag membership
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }
}

/// Input for creating a note
///
/// Tags are already decided by the caller (manual or classified).
#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    /// Title
    pub title: String,
    /// Content
    pub content: String,
    /// Tags to store
    pub tags: Vec<String>,
    /// Whether `tags` came from the classifier
    pub auto_tagged: bool,
}

/// Partial update of a note - only `Some` fields are applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteUpdate {
    /// New title
    pub title: Option<String>,
    /// New content
    pub content: Option<String>,
    /// New manual tags
    pub tags: Option<Vec<String>>,
}

impl NoteUpdate {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none()
    }
}

/// Normalise manually supplied tags
///
/// Trims each tag, drops empty ones and removes duplicates (keeping the
/// first occurrence). Case is preserved.
///
/// # Examples
///
/// ```
/// use scrivener_domain::normalize_tags;
///
/// let tags = vec![" Custom ".to_string(), "".to_string(), "Custom".to_string()];
/// assert_eq!(normalize_tags(&tags), vec!["Custom".to_string()]);
/// ```
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || out.iter().any(|t| t == tag) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_note() -> Note {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        Note {
            id: NoteId::from_timestamp(at),
            title: "Budget Plan".to_string(),
            content: "Tracking my monthly budget".to_string(),
            tags: vec!["Finance".to_string()],
            auto_tagged: true,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_id_from_timestamp_includes_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(NoteId::from_timestamp(at).as_str(), "20231114_221320_123");
    }

    #[test]
    fn test_id_suffix() {
        let id = NoteId::parse("20240101_000000_000").unwrap();
        assert_eq!(id.with_suffix(2).as_str(), "20240101_000000_000_2");
    }

    #[test]
    fn test_id_order_is_numeric_on_suffix() {
        let base = NoteId::parse("20240506_070809_000").unwrap();
        let nine = base.with_suffix(9);
        let ten = base.with_suffix(10);
        assert!(base < nine);
        assert!(nine < ten);
        assert!(ten < NoteId::parse("20240506_070809_001").unwrap());
        assert_eq!(nine.cmp(&base.with_suffix(9)), Ordering::Equal);
    }

    #[test]
    fn test_id_rejects_path_characters() {
        assert!(NoteId::parse("../etc/passwd").is_err());
        assert!(NoteId::parse("a/b").is_err());
        assert!(NoteId::parse("").is_err());
        assert!(NoteId::parse(&"x".repeat(NoteId::MAX_LEN + 1)).is_err());
        assert!(NoteId::parse("note-1_a").is_ok());
    }

    #[test]
    fn test_id_deserialize_validates() {
        let bad: Result<NoteId, _> = serde_json::from_str("\"a.b\"");
        assert!(bad.is_err());
        let good: NoteId = serde_json::from_str("\"abc_1\"").unwrap();
        assert_eq!(good.as_str(), "abc_1");
    }

    #[test]
    fn test_next_update_time_is_strictly_later() {
        let note = sample_note();
        let same = note.next_update_time(note.updated_at);
        assert!(same > note.updated_at);

        let earlier = note.next_update_time(note.updated_at - Duration::seconds(5));
        assert!(earlier > note.updated_at);

        let later = note.updated_at + Duration::seconds(5);
        assert_eq!(note.next_update_time(later), later);
    }

    #[test]
    fn test_matches_query_covers_all_fields() {
        let note = sample_note();
        assert!(note.matches_query("BUDGET"));
        assert!(note.matches_query("monthly"));
        assert!(note.matches_query("finan"));
        assert!(!note.matches_query("hello"));
    }

    #[test]
    fn test_has_tag_is_exact_and_case_insensitive() {
        let note = sample_note();
        assert!(note.has_tag("finance"));
        assert!(!note.has_tag("fin"));
    }

    #[test]
    fn test_validate() {
        let mut note = sample_note();
        assert!(note.validate().is_ok());

        note.title = "   ".to_string();
        assert!(note.validate().is_err());

        let mut note = sample_note();
        note.created_at = note.updated_at + Duration::seconds(1);
        assert!(note.validate().is_err());
    }

    #[test]
    fn test_note_json_shape() {
        let note = sample_note();
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["id"], "20240102_030405_000");
        assert_eq!(json["tags"][0], "Finance");
        assert_eq!(json["auto_tagged"], true);

        let back: Note = serde_json::from_value(json).unwrap();
        assert_eq!(back, note);
    }

    #[test]
    fn test_normalize_tags_keeps_order() {
        let tags = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(normalize_tags(&tags), vec!["b", "a"]);
    }
}
