//! Filenames for new notes.

use std::path::{Path, PathBuf};

const MAX_SLUG_LENGTH: usize = 50;

/// Converts a title to a filename-friendly slug.
///
/// Lowercases, turns whitespace into hyphens, keeps ASCII alphanumerics,
/// `-` and `_`, collapses hyphen runs and trims them from both ends. Long
/// slugs are cut at a hyphen near the limit when one exists. An empty result
/// becomes `untitled`.
///
/// # Examples
///
/// ```
/// use notemaker::infra::slugify;
///
/// assert_eq!(slugify("Weekly Review"), "weekly-review");
/// assert_eq!(slugify("Hello,   World!"), "hello-world");
/// assert_eq!(slugify("???"), "untitled");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        let mapped = match c {
            c if c.is_ascii_alphanumeric() || c == '_' => c,
            c if c.is_whitespace() || c == '-' => '-',
            _ => continue,
        };
        if mapped == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(mapped);
    }

    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        return "untitled".to_string();
    }
    if slug.len() <= MAX_SLUG_LENGTH {
        return slug.to_string();
    }

    let truncated = &slug[..MAX_SLUG_LENGTH];
    match truncated.rfind('-') {
        Some(cut) if cut > MAX_SLUG_LENGTH / 2 => truncated[..cut].to_string(),
        _ => truncated.trim_end_matches('-').to_string(),
    }
}

/// Returns `<slug>.md` for a title.
pub fn generate_filename(title: &str) -> String {
    format!("{}.md", slugify(title))
}

/// Picks a path in `dir` for a new note that does not collide with an
/// existing file, appending `-2`, `-3`, ... to the slug as needed.
pub fn unique_note_path(dir: &Path, title: &str) -> PathBuf {
    let slug = slugify(title);
    let mut candidate = dir.join(format!("{slug}.md"));
    let mut n = 2;
    while candidate.exists() {
        candidate = dir.join(format!("{slug}-{n}.md"));
        n += 1;
    }
    candidate
}
