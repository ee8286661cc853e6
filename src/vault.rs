//! An open directory of notes and its tag index.

use crate::domain::Metadata;
use crate::index::{BuildResult, IndexBuilder, NoopReporter, ProgressReporter, TagIndex, note_id};
use crate::infra::{
    self, FsError, ParsedNote, extract_tags, read_note_content, unique_note_path,
    write_note_content,
};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error(transparent)]
    Fs(#[from] FsError),

    #[error("note path must stay inside the vault: {0}")]
    OutsideVault(String),
}

/// The notes directory the application has open.
///
/// Notes are addressed by their vault-relative path with `/` separators
/// (`projects/plan.md`). Every successful write or delete goes through
/// [`save_note`](Vault::save_note) or [`delete_note`](Vault::delete_note),
/// which keep the [`TagIndex`] in step with the files on disk.
#[derive(Debug)]
pub struct Vault {
    root: PathBuf,
    index: TagIndex,
}

impl Vault {
    /// Creates a vault with an empty index, without touching the disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index: TagIndex::new(),
        }
    }

    /// Opens a vault and indexes every note in it.
    ///
    /// Notes that cannot be read are logged and skipped.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, VaultError> {
        let mut vault = Self::new(root);
        vault.reload()?;
        Ok(vault)
    }

    /// Rebuilds the index from the files on disk.
    pub fn reload(&mut self) -> Result<BuildResult, VaultError> {
        self.reload_with_progress(&mut NoopReporter)
    }

    pub fn reload_with_progress<P: ProgressReporter>(
        &mut self,
        progress: &mut P,
    ) -> Result<BuildResult, VaultError> {
        let builder = IndexBuilder::new(self.root.clone());
        Ok(builder.full_rebuild_with_progress(&mut self.index, progress)?)
    }

    /// Ends the session. The index is emptied; listeners stay registered.
    pub fn close(&mut self) {
        self.index.clear();
        log::info!("closed vault {}", self.root.display());
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index(&self) -> &TagIndex {
        &self.index
    }

    /// Converts a user-supplied path to a note id.
    ///
    /// Absolute paths must lie under the vault root. Relative paths are taken
    /// relative to the root and may not climb out of it.
    pub fn resolve(&self, path: &Path) -> Result<String, VaultError> {
        let relative = if path.is_absolute() {
            path.strip_prefix(&self.root)
                .map_err(|_| VaultError::OutsideVault(path.display().to_string()))?
        } else {
            path
        };
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
        {
            return Err(VaultError::OutsideVault(path.display().to_string()));
        }
        let id = note_id(relative);
        if id.is_empty() {
            return Err(VaultError::OutsideVault(path.display().to_string()));
        }
        Ok(id)
    }

    /// Absolute location of a note.
    pub fn path_of(&self, id: &str) -> Result<PathBuf, VaultError> {
        let id = self.resolve(Path::new(id))?;
        Ok(self.root.join(id))
    }

    pub fn read_content(&self, id: &str) -> Result<String, VaultError> {
        Ok(read_note_content(&self.path_of(id)?)?)
    }

    pub fn read_note(&self, id: &str) -> Result<ParsedNote, VaultError> {
        Ok(infra::parse(&self.read_content(id)?))
    }

    /// Writes a note and re-indexes its tags.
    ///
    /// The index is only touched once the write has succeeded.
    pub fn save_note(&mut self, id: &str, content: &str) -> Result<(), VaultError> {
        let id = self.resolve(Path::new(id))?;
        write_note_content(&self.root.join(&id), content)?;
        let parsed = infra::parse(content);
        self.index.index_note(&id, extract_tags(&parsed.body));
        log::debug!("saved {id}");
        Ok(())
    }

    /// Deletes a note and drops it from the index.
    pub fn delete_note(&mut self, id: &str) -> Result<(), VaultError> {
        let id = self.resolve(Path::new(id))?;
        infra::delete_note(&self.root.join(&id))?;
        self.index.remove_note(&id);
        log::debug!("deleted {id}");
        Ok(())
    }

    /// Renames a note and moves its tags to the new id.
    ///
    /// Never overwrites an existing note. Returns the new id.
    pub fn rename_note(&mut self, from: &str, to: &str) -> Result<String, VaultError> {
        let from = self.resolve(Path::new(from))?;
        let to = self.resolve(Path::new(to))?;
        infra::rename_note(&self.root.join(&from), &self.root.join(&to))?;

        let tags = self.index.tags_for_note(&from);
        self.index.remove_note(&from);
        self.index.index_note(&to, tags);
        log::debug!("renamed {from} to {to}");
        Ok(to)
    }

    /// Moves a note into another vault directory, keeping its file name.
    ///
    /// `dir` is vault-relative; an empty string means the vault root.
    pub fn move_note(&mut self, id: &str, dir: &str) -> Result<String, VaultError> {
        let id = self.resolve(Path::new(id))?;
        let file_name = id.rsplit('/').next().unwrap_or(&id);
        let target = if dir.trim_matches('/').is_empty() {
            file_name.to_string()
        } else {
            let dir = self.resolve(Path::new(dir))?;
            if !self.root.join(&dir).is_dir() {
                return Err(FsError::NotADirectory {
                    path: self.root.join(&dir),
                }
                .into());
            }
            format!("{dir}/{file_name}")
        };
        self.rename_note(&id, &target)
    }

    /// Creates a note in the vault root and returns its id.
    ///
    /// The filename is derived from the title and never overwrites an
    /// existing note.
    pub fn create_note(
        &mut self,
        title: &str,
        body: Option<&str>,
        initial: Option<&Metadata>,
    ) -> Result<String, VaultError> {
        let path = unique_note_path(&self.root, title);
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| VaultError::OutsideVault(path.display().to_string()))?;
        let id = note_id(relative);
        self.save_note(&id, &infra::create_new(title, body, initial))?;
        Ok(id)
    }

    /// Merges `updates` into a note's header, stamps `modified` and saves it.
    ///
    /// Returns the new note text.
    pub fn update_metadata(&mut self, id: &str, updates: &Metadata) -> Result<String, VaultError> {
        let content = infra::update(&self.read_content(id)?, updates);
        self.save_note(id, &content)?;
        Ok(content)
    }
}
