//! Case-insensitive tag type used as the tag index key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Color used for tags without an entry in the color table.
pub const DEFAULT_TAG_COLOR: &str = "#6b7280";

/// Fixed color assignments, keyed by normalized tag name.
const TAG_COLORS: &[(&str, &str)] = &[
    ("todo", "#f59e0b"),
    ("done", "#10b981"),
    ("important", "#ef4444"),
    ("urgent", "#dc2626"),
    ("idea", "#8b5cf6"),
    ("question", "#3b82f6"),
    ("bug", "#e11d48"),
    ("feature", "#0ea5e9"),
    ("draft", "#a3a3a3"),
    ("review", "#f97316"),
    ("project", "#6366f1"),
    ("meeting", "#14b8a6"),
    ("work", "#2563eb"),
    ("personal", "#ec4899"),
];

/// A normalized tag name.
///
/// Tags are compared case-insensitively: the name is trimmed and lowercased
/// on construction, making `Project`, `project` and ` PROJECT ` the same tag.
///
/// # Examples
///
/// ```
/// use notemaker::domain::Tag;
///
/// let tag = Tag::new("  Project ").unwrap();
/// assert_eq!(tag.as_str(), "project");
/// assert_eq!(tag, Tag::new("PROJECT").unwrap());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String); // Always stored trimmed and lowercase

/// Error returned when a tag is empty after normalization.
#[derive(Debug, Clone)]
pub struct ParseTagError(String);

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseTagError {}

impl Tag {
    /// Creates a tag from raw text, normalizing it.
    ///
    /// # Errors
    ///
    /// Returns `ParseTagError` if the tag is empty or whitespace-only.
    pub fn new(s: &str) -> Result<Self, ParseTagError> {
        let normalized = normalize(s);
        if normalized.is_empty() {
            return Err(ParseTagError("tag cannot be empty".to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the display color for this tag.
    pub fn color(&self) -> &'static str {
        TAG_COLORS
            .iter()
            .find(|(name, _)| *name == self.0)
            .map_or(DEFAULT_TAG_COLOR, |(_, color)| color)
    }
}

/// Normalizes a tag name for comparison: trim, then lowercase.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag(\"{}\")", self.0)
    }
}

impl FromStr for Tag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
