use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::ShowArgs;
use crate::cli::output::{NoteView, Output, OutputFormat};
use crate::domain::Metadata;
use crate::infra::extract_tags;
use crate::vault::Vault;

pub fn handle_show(args: &ShowArgs, notes_dir: &Path) -> Result<()> {
    let vault = Vault::new(notes_dir);
    let id = vault.resolve(&args.note)?;
    let parsed = vault
        .read_note(&id)
        .with_context(|| format!("failed to read note: {id}"))?;
    let tags = extract_tags(&parsed.body);

    match args.format {
        OutputFormat::Json => {
            let view = NoteView {
                id: &id,
                metadata: parsed.metadata.as_ref(),
                tags,
                body: &parsed.body,
            };
            println!("{}", serde_json::to_string_pretty(&Output::new(view))?);
        }
        OutputFormat::Paths => {
            println!("{}", vault.path_of(&id)?.display());
        }
        OutputFormat::Human => {
            let title = parsed
                .metadata
                .as_ref()
                .and_then(Metadata::title)
                .unwrap_or(&id);
            println!("# {title}");
            println!();

            if let Some(metadata) = &parsed.metadata {
                for line in header_lines(metadata) {
                    println!("{line}");
                }
            }
            if !tags.is_empty() {
                println!("Tags: {}", tags.join(", "));
            }
            println!();

            if !parsed.body.is_empty() {
                println!("{}", parsed.body);
            }
        }
    }
    Ok(())
}

/// Formats header fields for human output, well-known keys first.
pub(crate) fn header_lines(metadata: &Metadata) -> Vec<String> {
    let mut lines = Vec::new();

    let labels = metadata.labels();
    if !labels.is_empty() {
        lines.push(format!("Labels: {}", labels.join(", ")));
    }
    if let Some(status) = metadata.kanban_status() {
        lines.push(format!("Status: {status}"));
    }
    if let Some(category) = metadata.category() {
        lines.push(format!("Category: {category}"));
    }
    if metadata.pinned() == Some(true) {
        lines.push("Pinned: yes".to_string());
    }
    if metadata.archived() == Some(true) {
        lines.push("Archived: yes".to_string());
    }
    match (metadata.created(), metadata.modified()) {
        (Some(created), Some(modified)) => {
            lines.push(format!("Created: {created}  Modified: {modified}"));
        }
        (Some(created), None) => lines.push(format!("Created: {created}")),
        (None, Some(modified)) => lines.push(format!("Modified: {modified}")),
        (None, None) => {}
    }
    for (key, value) in metadata.custom_fields() {
        lines.push(format!("{key}: {value}"));
    }
    lines
}
