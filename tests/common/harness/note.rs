//! Builder for test notes with sensible defaults.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use notemaker::domain::{KanbanStatus, MetaValue, Metadata};
use notemaker::infra::frontmatter::create_new_at;
use notemaker::infra::generate_filename;

/// Builder for creating test notes with sensible defaults.
///
/// Timestamps are fixed so rendered notes are stable across runs.
#[derive(Debug)]
pub struct TestNote {
    title: String,
    file: Option<String>,
    created: DateTime<Utc>,
    labels: Vec<String>,
    status: Option<KanbanStatus>,
    category: Option<String>,
    pinned: bool,
    custom: Vec<(String, MetaValue)>,
    body: Option<String>,
}

impl TestNote {
    /// Creates a new test note with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file: None,
            created: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            labels: Vec::new(),
            status: None,
            category: None,
            pinned: false,
            custom: Vec::new(),
            body: None,
        }
    }

    /// Sets the vault-relative file path (default: slug of the title).
    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Adds a label to the header.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn status(mut self, status: KanbanStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    /// Adds a custom header field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.custom.push((key.into(), value.into()));
        self
    }

    /// Sets the body content (default: a heading with the title).
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Vault-relative path the note is written to.
    pub fn relative_path(&self) -> String {
        self.file
            .clone()
            .unwrap_or_else(|| generate_filename(&self.title))
    }

    /// Header fields beyond the ones every new note gets.
    pub fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        if !self.labels.is_empty() {
            metadata.set_labels(&self.labels);
        }
        if let Some(status) = self.status {
            metadata.set_kanban_status(status);
        }
        if let Some(category) = &self.category {
            metadata.set_category(category.as_str());
        }
        if self.pinned {
            metadata.set_pinned(true);
        }
        for (key, value) in &self.custom {
            metadata.insert(key.as_str(), value.clone());
        }
        metadata
    }

    /// Full file content.
    pub fn content(&self) -> String {
        create_new_at(
            &self.title,
            self.body.as_deref(),
            Some(&self.metadata()),
            self.created,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notemaker::infra::parse;

    // ===========================================
    // Phase 2: TestNote Builder
    // ===========================================

    #[test]
    fn test_note_new_with_title() {
        let note = TestNote::new("My Test Note");
        assert_eq!(note.title(), "My Test Note");
        assert_eq!(note.relative_path(), "my-test-note.md");
    }

    #[test]
    fn test_note_content_parses_back() {
        let note = TestNote::new("Plan")
            .label("work")
            .status(KanbanStatus::Review)
            .field("priority", 2i64)
            .body("#launch notes");

        let parsed = parse(&note.content());
        let metadata = parsed.metadata.expect("header should parse");
        assert_eq!(metadata.title(), Some("Plan"));
        assert_eq!(metadata.labels(), vec!["work"]);
        assert_eq!(metadata.kanban_status(), Some(KanbanStatus::Review));
        assert_eq!(metadata.get("priority"), Some(&MetaValue::Integer(2)));
        assert_eq!(metadata.created(), Some("2024-01-15T10:30:00.000Z"));
        assert_eq!(parsed.body, "#launch notes");
    }

    #[test]
    fn test_note_default_body_is_heading() {
        let parsed = parse(&TestNote::new("Heading").content());
        assert_eq!(parsed.body, "\n# Heading\n");
    }

    #[test]
    fn test_note_explicit_file() {
        let note = TestNote::new("Any").file("sub/custom.md");
        assert_eq!(note.relative_path(), "sub/custom.md");
    }
}
