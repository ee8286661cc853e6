//! Populates a [`TagIndex`] from the markdown files of a vault.

use crate::index::TagIndex;
use crate::infra::{FsError, extract_tags, read_note, scan_notes_directory};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

// ===========================================
// Result Types
// ===========================================

/// A note that could not be indexed.
#[derive(Debug, Error)]
#[error("{}: {source}", path.display())]
pub struct BuildError {
    /// Path relative to the vault root.
    pub path: PathBuf,
    #[source]
    pub source: FsError,
}

/// Outcome of a full scan.
#[derive(Debug, Default)]
pub struct BuildResult {
    /// Number of notes indexed.
    pub indexed: usize,
    /// Notes that were skipped because they could not be read.
    pub errors: Vec<BuildError>,
}

// ===========================================
// Progress Reporting
// ===========================================

/// Result of processing a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileResult {
    /// Indexed with this many distinct tags.
    Indexed { tags: usize },
    Error(String),
}

/// Receives per-file progress while a vault is scanned.
pub trait ProgressReporter {
    fn on_file(&mut self, path: &Path, result: FileResult);
    fn on_complete(&mut self, indexed: usize, errors: usize);
}

#[derive(Debug, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_file(&mut self, _path: &Path, _result: FileResult) {}
    fn on_complete(&mut self, _indexed: usize, _errors: usize) {}
}

// ===========================================
// IndexBuilder
// ===========================================

/// Scans a notes directory and feeds each note's inline tags to a [`TagIndex`].
///
/// Notes are keyed by [`note_id`]: their path relative to the notes
/// directory, with `/` separators.
pub struct IndexBuilder {
    notes_dir: PathBuf,
}

impl IndexBuilder {
    pub fn new(notes_dir: PathBuf) -> Self {
        Self { notes_dir }
    }

    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    /// Clears `index` and re-indexes every note in the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be scanned. Unreadable notes
    /// are collected in the returned [`BuildResult`] instead.
    pub fn full_rebuild(&self, index: &mut TagIndex) -> Result<BuildResult, FsError> {
        self.full_rebuild_with_progress(index, &mut NoopReporter)
    }

    pub fn full_rebuild_with_progress<P: ProgressReporter>(
        &self,
        index: &mut TagIndex,
        progress: &mut P,
    ) -> Result<BuildResult, FsError> {
        let files: Vec<PathBuf> = scan_notes_directory(&self.notes_dir)?.collect();
        index.clear();

        let mut result = BuildResult::default();
        for relative_path in files {
            match read_note(&self.notes_dir.join(&relative_path)) {
                Ok(parsed) => {
                    let tags = extract_tags(&parsed.body);
                    let count = tags.len();
                    index.index_note(&note_id(&relative_path), tags);
                    result.indexed += 1;
                    progress.on_file(&relative_path, FileResult::Indexed { tags: count });
                }
                Err(source) => {
                    log::warn!("skipping {}: {source}", relative_path.display());
                    progress.on_file(&relative_path, FileResult::Error(source.to_string()));
                    result.errors.push(BuildError {
                        path: relative_path,
                        source,
                    });
                }
            }
        }

        log::info!(
            "indexed {} notes ({} tags, {} skipped) in {}",
            result.indexed,
            index.len(),
            result.errors.len(),
            self.notes_dir.display()
        );
        progress.on_complete(result.indexed, result.errors.len());
        Ok(result)
    }
}

/// Identifier for a note: its relative path joined with `/`.
///
/// Current-directory components are dropped.
pub fn note_id(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
