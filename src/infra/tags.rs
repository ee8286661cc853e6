//! Inline `#tag` extraction from note bodies.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static INLINE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#([A-Za-z][A-Za-z0-9_-]*)").unwrap());

/// Extracts inline tags from a note body.
///
/// A tag is `#` at the start of the text or after whitespace, followed by a
/// letter and then letters, digits, `_` or `-`. Markdown headings (`# Title`)
/// do not match because of the space after `#`.
///
/// Matches are returned in order of first appearance. Case variants of a tag
/// already seen are skipped, so the first spelling wins. Normalization for
/// indexing is left to [`TagIndex`](crate::index::TagIndex).
///
/// # Examples
///
/// ```
/// use notemaker::infra::extract_tags;
///
/// let tags = extract_tags("# Plan\n#Project kickoff, see #project and #todo");
/// assert_eq!(tags, vec!["Project", "todo"]);
/// ```
pub fn extract_tags(body: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    INLINE_TAG_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .map(str::to_string)
        .collect()
}
