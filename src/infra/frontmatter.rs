//! Header block codec: YAML metadata between `---` marker lines.

use crate::domain::{MetaValue, MetaValueError, Metadata};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_yaml::Value as YamlValue;
use thiserror::Error;

/// The line that opens and closes a header block.
pub const MARKER: &str = "---";

/// Result of splitting a note's text into header metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNote {
    /// `None` when no header block was recognized or it was malformed.
    pub metadata: Option<Metadata>,
    pub body: String,
    /// The text that was parsed.
    pub raw: String,
}

/// Reasons a recognized header is treated as absent.
#[derive(Debug, Error)]
pub(crate) enum HeaderError {
    #[error("invalid YAML in header: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("header must be a mapping of keys to values")]
    NotAMapping,

    #[error("unsupported header value: {0}")]
    UnsupportedValue(#[from] MetaValueError),
}

/// Header and body slices of a note that has both markers.
struct HeaderSplit<'a> {
    yaml: &'a str,
    body: &'a str,
}

/// Parses a note into metadata and body.
///
/// # Format
/// ```text
/// ---
/// title: Note Title
/// labels:
/// - work
/// created: 2024-01-15T10:30:00.000Z
/// ---
/// Body content here...
/// ```
///
/// The opening marker must sit at offset 0 and a closing marker line must
/// follow; `\n` and `\r\n` line endings are both accepted. The closing
/// marker's line terminator is consumed, everything after it is the body.
///
/// This never fails. Without both markers the whole input is the body. A
/// header whose YAML is malformed is logged and treated the same way.
pub fn parse(content: &str) -> ParsedNote {
    let raw = content.to_string();
    let Some(split) = split_header(content) else {
        return ParsedNote {
            metadata: None,
            body: raw.clone(),
            raw,
        };
    };

    match parse_yaml(split.yaml) {
        Ok(metadata) => ParsedNote {
            metadata: Some(metadata),
            body: split.body.to_string(),
            raw,
        },
        Err(err) => {
            log::warn!("ignoring malformed note header: {err}");
            ParsedNote {
                metadata: None,
                body: raw.clone(),
                raw,
            }
        }
    }
}

/// Renders metadata and body back into note text.
///
/// Null, empty-string and empty-list values are dropped. If nothing is left
/// (or `metadata` is `None`) the body is returned unchanged. Keys are written
/// in the metadata's own order. The closing marker is followed by a single
/// newline and the body, or by nothing when the body is empty.
pub fn serialize(metadata: Option<&Metadata>, body: &str) -> String {
    let Some(metadata) = metadata else {
        return body.to_string();
    };

    let kept = metadata.without_blank();
    if kept.is_empty() {
        return body.to_string();
    }

    let yaml = serde_yaml::to_string(&kept).expect("metadata serialization is infallible");
    if body.is_empty() {
        format!("{MARKER}\n{yaml}{MARKER}")
    } else {
        format!("{MARKER}\n{yaml}{MARKER}\n{body}")
    }
}

/// Merges `updates` into the note's metadata and stamps `modified`.
pub fn update(content: &str, updates: &Metadata) -> String {
    update_at(content, updates, Utc::now())
}

/// Like [`update`], with an explicit `modified` time.
pub fn update_at(content: &str, updates: &Metadata, now: DateTime<Utc>) -> String {
    let parsed = parse(content);
    let mut metadata = parsed.metadata.unwrap_or_default();
    metadata.merge(updates);
    metadata.set_modified(timestamp(now));
    serialize(Some(&metadata), &parsed.body)
}

/// Builds the text of a brand-new note.
///
/// The header gets `title`, empty `labels`, and `created`/`modified` set to
/// now, then `initial` is merged over it. Without a body the note starts
/// with a heading made from the title.
pub fn create_new(title: &str, body: Option<&str>, initial: Option<&Metadata>) -> String {
    create_new_at(title, body, initial, Utc::now())
}

/// Like [`create_new`], with an explicit creation time.
pub fn create_new_at(
    title: &str,
    body: Option<&str>,
    initial: Option<&Metadata>,
    now: DateTime<Utc>,
) -> String {
    let stamp = timestamp(now);
    let mut metadata = Metadata::new();
    metadata.set_title(title);
    metadata.set_labels(Vec::<String>::new());
    metadata.set_created(stamp.clone());
    metadata.set_modified(stamp);
    if let Some(initial) = initial {
        metadata.merge(initial);
    }

    let body = body.map_or_else(|| format!("\n# {title}\n"), str::to_string);
    serialize(Some(&metadata), &body)
}

/// Reads only the header of a note.
///
/// Uses the same recognition rule as [`parse`] without copying the body.
pub fn extract_fast(content: &str) -> Option<Metadata> {
    let split = split_header(content)?;
    match parse_yaml(split.yaml) {
        Ok(metadata) => Some(metadata),
        Err(err) => {
            log::warn!("ignoring malformed note header: {err}");
            None
        }
    }
}

/// Returns true if the content has an opening and a closing marker.
///
/// This is a structural check; the YAML between the markers is not parsed.
pub fn has_header(content: &str) -> bool {
    split_header(content).is_some()
}

/// Formats a timestamp the way headers store `created` and `modified`.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn split_header(content: &str) -> Option<HeaderSplit<'_>> {
    let after_opening = if content.starts_with("---\r\n") {
        5
    } else if content.starts_with("---\n") {
        4
    } else {
        return None;
    };

    let rest = &content[after_opening..];
    let closing_pos = find_closing_delimiter(rest)?;
    let after_closing = &rest[closing_pos..];
    let body = after_closing
        .strip_prefix("---\r\n")
        .or_else(|| after_closing.strip_prefix("---\n"))
        .unwrap_or(&after_closing[MARKER.len()..]);

    Some(HeaderSplit {
        yaml: &rest[..closing_pos],
        body,
    })
}

/// Finds the byte offset of the closing `---` line.
///
/// The closing delimiter must:
/// - Appear at the start of a line
/// - Be exactly `---` followed by newline or EOF
fn find_closing_delimiter(content: &str) -> Option<usize> {
    let mut pos = 0;
    let bytes = content.as_bytes();

    while pos < bytes.len() {
        if content[pos..].starts_with(MARKER) {
            let after = pos + MARKER.len();
            if after >= bytes.len()
                || bytes[after] == b'\n'
                || (bytes[after] == b'\r' && after + 1 < bytes.len() && bytes[after + 1] == b'\n')
            {
                return Some(pos);
            }
        }

        match content[pos..].find('\n') {
            Some(newline_offset) => pos += newline_offset + 1,
            None => break,
        }
    }

    None
}

fn parse_yaml(yaml: &str) -> Result<Metadata, HeaderError> {
    match serde_yaml::from_str::<YamlValue>(yaml)? {
        // Empty or comment-only header
        YamlValue::Null => Ok(Metadata::new()),
        mapping @ YamlValue::Mapping(_) => match MetaValue::try_from(mapping)? {
            MetaValue::Map(fields) => Ok(fields.into_iter().collect()),
            _ => Err(HeaderError::NotAMapping),
        },
        _ => Err(HeaderError::NotAMapping),
    }
}
