//! Ordered header metadata with typed access to the well-known keys.

use crate::domain::{KanbanStatus, MetaValue};
use indexmap::IndexMap;
use serde::Serialize;

/// Names of the well-known header keys.
pub mod keys {
    pub const TITLE: &str = "title";
    pub const LABELS: &str = "labels";
    pub const CREATED: &str = "created";
    pub const MODIFIED: &str = "modified";
    pub const KANBAN_STATUS: &str = "kanban-status";
    pub const CATEGORY: &str = "category";
    pub const PINNED: &str = "pinned";
    pub const ARCHIVED: &str = "archived";

    /// Every well-known key. Any other key is a custom key.
    pub const ALL: [&str; 8] = [
        TITLE,
        LABELS,
        CREATED,
        MODIFIED,
        KANBAN_STATUS,
        CATEGORY,
        PINNED,
        ARCHIVED,
    ];

    /// Returns true if `key` is one of the well-known keys.
    pub fn is_known(key: &str) -> bool {
        ALL.contains(&key)
    }
}

/// The structured header of a note.
///
/// An insertion-ordered map from key to [`MetaValue`]. Keys are unique;
/// re-inserting an existing key replaces its value in place, so a header
/// keeps the key order it was written with.
///
/// The typed getters return `None` when the key is missing or holds a value
/// of the wrong shape. The raw value stays in the map either way, so a
/// note written by another tool round-trips unchanged.
///
/// # Examples
///
/// ```
/// use notemaker::domain::{KanbanStatus, Metadata};
///
/// let mut meta = Metadata::new();
/// meta.set_title("Weekly Review");
/// meta.set_labels(["work", "planning"]);
/// meta.set_kanban_status(KanbanStatus::Todo);
/// meta.insert("priority", 2i64);
///
/// assert_eq!(meta.title(), Some("Weekly Review"));
/// assert_eq!(meta.labels(), vec!["work", "planning"]);
/// assert_eq!(meta.kanban_status(), Some(KanbanStatus::Todo));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    fields: IndexMap<String, MetaValue>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Sets `key` to `value`, returning the previous value.
    ///
    /// An existing key keeps its position; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Option<MetaValue> {
        self.fields.insert(key.into(), value.into())
    }

    /// Removes `key`, preserving the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        self.fields.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterates over the keys outside the well-known set.
    pub fn custom_fields(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.iter().filter(|(k, _)| !keys::is_known(k))
    }

    /// Shallow merge: every key of `other` overwrites the same key here.
    pub fn merge(&mut self, other: &Metadata) {
        for (key, value) in &other.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Returns a copy without null, empty-string and empty-list values.
    pub fn without_blank(&self) -> Metadata {
        self.fields
            .iter()
            .filter(|(_, v)| !v.is_blank())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    // ===========================================
    // Well-known keys
    // ===========================================

    pub fn title(&self) -> Option<&str> {
        self.get(keys::TITLE).and_then(MetaValue::as_str)
    }

    /// Returns the string entries of `labels`.
    ///
    /// A bare string is treated as a single label; non-string list items are skipped.
    pub fn labels(&self) -> Vec<&str> {
        match self.get(keys::LABELS) {
            Some(MetaValue::List(items)) => items.iter().filter_map(MetaValue::as_str).collect(),
            Some(MetaValue::String(s)) => vec![s.as_str()],
            _ => Vec::new(),
        }
    }

    pub fn created(&self) -> Option<&str> {
        self.get(keys::CREATED).and_then(MetaValue::as_str)
    }

    pub fn modified(&self) -> Option<&str> {
        self.get(keys::MODIFIED).and_then(MetaValue::as_str)
    }

    pub fn kanban_status(&self) -> Option<KanbanStatus> {
        self.get(keys::KANBAN_STATUS)
            .and_then(MetaValue::as_str)
            .and_then(|s| s.parse().ok())
    }

    pub fn category(&self) -> Option<&str> {
        self.get(keys::CATEGORY).and_then(MetaValue::as_str)
    }

    pub fn pinned(&self) -> Option<bool> {
        self.get(keys::PINNED).and_then(MetaValue::as_bool)
    }

    pub fn archived(&self) -> Option<bool> {
        self.get(keys::ARCHIVED).and_then(MetaValue::as_bool)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.insert(keys::TITLE, title.into());
    }

    pub fn set_labels<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        self.insert(keys::LABELS, labels);
    }

    pub fn set_created(&mut self, timestamp: impl Into<String>) {
        self.insert(keys::CREATED, timestamp.into());
    }

    pub fn set_modified(&mut self, timestamp: impl Into<String>) {
        self.insert(keys::MODIFIED, timestamp.into());
    }

    pub fn set_kanban_status(&mut self, status: KanbanStatus) {
        self.insert(keys::KANBAN_STATUS, status.as_str());
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.insert(keys::CATEGORY, category.into());
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        self.insert(keys::PINNED, pinned);
    }

    pub fn set_archived(&mut self, archived: bool) {
        self.insert(keys::ARCHIVED, archived);
    }
}

impl FromIterator<(String, MetaValue)> for Metadata {
    fn from_iter<T: IntoIterator<Item = (String, MetaValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = (&'a String, &'a MetaValue);
    type IntoIter = indexmap::map::Iter<'a, String, MetaValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
