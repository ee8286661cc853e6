use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::NewArgs;
use crate::domain::Metadata;
use crate::vault::Vault;

pub fn handle_new(args: &NewArgs, notes_dir: &Path) -> Result<()> {
    let initial = initial_metadata(args);
    let mut vault = Vault::new(notes_dir);
    let id = vault
        .create_note(&args.title, args.body.as_deref(), Some(&initial))
        .with_context(|| format!("failed to create note '{}'", args.title))?;

    println!("Created: {id}");
    Ok(())
}

/// Header fields given on the command line.
pub(crate) fn initial_metadata(args: &NewArgs) -> Metadata {
    let mut metadata = Metadata::new();
    if !args.labels.is_empty() {
        metadata.set_labels(&args.labels);
    }
    if let Some(category) = &args.category {
        metadata.set_category(category.as_str());
    }
    if let Some(status) = args.status {
        metadata.set_kanban_status(status);
    }
    if args.pinned {
        metadata.set_pinned(true);
    }
    metadata
}
