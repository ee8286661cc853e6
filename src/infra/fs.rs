//! Note file I/O with atomic writes.

use crate::domain::Metadata;
use crate::infra::frontmatter::{ParsedNote, parse, serialize};
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Errors during file system operations on notes.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("note file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("atomic write failed for {path}: {source}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parent directory does not exist: {path}")]
    ParentNotFound { path: PathBuf },

    #[error("note already exists: {path}")]
    AlreadyExists { path: PathBuf },

    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("invalid encoding in {path}: {encoding}")]
    InvalidEncoding { path: PathBuf, encoding: String },
}

impl FsError {
    /// Creates an appropriate FsError from an io::Error.
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path: path.into() },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path: path.into() },
            _ => FsError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// Reads a note file as UTF-8 text, stripping a UTF-8 byte order mark.
///
/// # Errors
///
/// Returns `FsError::NotFound` / `FsError::PermissionDenied` for the matching
/// I/O failures and `FsError::InvalidEncoding` for UTF-16 or invalid UTF-8.
pub fn read_note_content(path: &Path) -> Result<String, FsError> {
    let bytes = std::fs::read(path).map_err(|e| FsError::from_io(path, e))?;
    decode_note_bytes(bytes, path)
}

/// Reads and parses a note file.
///
/// A missing or malformed header is not an error; see [`parse`].
pub fn read_note(path: &Path) -> Result<ParsedNote, FsError> {
    read_note_content(path).map(|content| parse(&content))
}

fn decode_note_bytes(bytes: Vec<u8>, path: &Path) -> Result<String, FsError> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(FsError::InvalidEncoding {
            path: path.into(),
            encoding: "UTF-16 LE detected (byte order mark FF FE); convert to UTF-8".into(),
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(FsError::InvalidEncoding {
            path: path.into(),
            encoding: "UTF-16 BE detected (byte order mark FE FF); convert to UTF-8".into(),
        });
    }

    let content = String::from_utf8(bytes).map_err(|e| FsError::InvalidEncoding {
        path: path.into(),
        encoding: format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()),
    })?;

    Ok(match content.strip_prefix('\u{FEFF}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// Writes note text to a file atomically.
///
/// Uses a temporary file in the same directory and an atomic rename, so a
/// reader never sees a partial note. The parent directory must exist.
///
/// # Errors
///
/// Returns `FsError::ParentNotFound` if the parent directory doesn't exist.
/// Returns `FsError::AtomicWrite` if the atomic rename fails.
pub fn write_note_content(path: &Path, content: &str) -> Result<(), FsError> {
    let parent = path
        .parent()
        .ok_or_else(|| FsError::ParentNotFound { path: path.into() })?;

    if !parent.exists() {
        return Err(FsError::ParentNotFound {
            path: parent.into(),
        });
    }

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| FsError::Io {
        path: path.into(),
        source: e,
    })?;

    temp.write_all(content.as_bytes()).map_err(|e| FsError::Io {
        path: path.into(),
        source: e,
    })?;

    temp.persist(path).map_err(|e| FsError::AtomicWrite {
        path: path.into(),
        source: e.error,
    })?;

    Ok(())
}

/// Serializes metadata and body and writes them atomically.
pub fn write_note(path: &Path, metadata: Option<&Metadata>, body: &str) -> Result<(), FsError> {
    write_note_content(path, &serialize(metadata, body))
}

/// Deletes a note file.
pub fn delete_note(path: &Path) -> Result<(), FsError> {
    std::fs::remove_file(path).map_err(|e| FsError::from_io(path, e))
}

/// Renames a note file without overwriting.
///
/// # Errors
///
/// Returns `FsError::NotFound` if `from` is missing, `FsError::AlreadyExists`
/// if `to` is taken and `FsError::ParentNotFound` if `to` has no parent
/// directory.
pub fn rename_note(from: &Path, to: &Path) -> Result<(), FsError> {
    if !from.is_file() {
        return Err(FsError::NotFound { path: from.into() });
    }
    if to.exists() {
        return Err(FsError::AlreadyExists { path: to.into() });
    }
    match to.parent() {
        Some(parent) if parent.is_dir() => {}
        _ => return Err(FsError::ParentNotFound { path: to.into() }),
    }
    std::fs::rename(from, to).map_err(|e| FsError::from_io(from, e))
}

/// Scans a directory recursively for markdown (.md) files.
///
/// Skips hidden files and directories (starting with `.`), including
/// the `.notemaker/` settings directory.
///
/// Returns paths relative to the input directory.
///
/// # Errors
///
/// Returns `FsError::NotFound` if the directory doesn't exist.
/// Returns `FsError::NotADirectory` if the path is not a directory.
pub fn scan_notes_directory(
    dir: &Path,
) -> Result<impl Iterator<Item = PathBuf> + use<>, FsError> {
    if !dir.exists() {
        return Err(FsError::NotFound {
            path: dir.to_path_buf(),
        });
    }
    if !dir.is_dir() {
        return Err(FsError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let dir_owned = dir.to_path_buf();
    let iter = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(has_md_extension)
        .filter_map(move |e| e.path().strip_prefix(&dir_owned).ok().map(Path::to_path_buf));

    Ok(iter)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

fn has_md_extension(entry: &DirEntry) -> bool {
    entry.path().extension().is_some_and(|e| e == "md")
}
