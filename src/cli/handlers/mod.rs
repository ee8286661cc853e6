//! Command handlers for the CLI.

mod capture;
mod metadata;
mod new;
mod show;
mod tags;


use anyhow::{Context, Result};
use std::path::Path;

use crate::index::{FileResult, ProgressReporter};
use crate::vault::Vault;

pub use capture::handle_capture;
pub use metadata::{handle_set, parse_assignment};
pub use new::handle_new;
pub use show::handle_show;
pub use tags::{handle_tagged, handle_tags};

// ===========================================
// Shared Utilities
// ===========================================

/// Progress reporter that writes to the log.
pub(crate) struct LogReporter;

impl ProgressReporter for LogReporter {
    fn on_file(&mut self, path: &Path, result: FileResult) {
        match result {
            FileResult::Indexed { tags } => {
                log::debug!("indexed {} ({tags} tags)", path.display());
            }
            FileResult::Error(msg) => log::debug!("failed {}: {msg}", path.display()),
        }
    }

    fn on_complete(&mut self, indexed: usize, errors: usize) {
        if errors > 0 {
            log::warn!("{errors} notes could not be read; run with -vv for details");
        }
        log::trace!("scan finished with {indexed} notes");
    }
}

/// Opens the notes directory and indexes it.
pub(crate) fn open_vault(notes_dir: &Path) -> Result<Vault> {
    let mut vault = Vault::new(notes_dir);
    vault
        .reload_with_progress(&mut LogReporter)
        .with_context(|| format!("failed to open notes directory {}", notes_dir.display()))?;
    Ok(vault)
}
