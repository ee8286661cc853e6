use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::cli::SetArgs;
use crate::domain::{KanbanStatus, MetaValue, Metadata, keys};
use crate::vault::Vault;

pub fn handle_set(args: &SetArgs, notes_dir: &Path) -> Result<()> {
    let mut updates = Metadata::new();
    for field in &args.fields {
        let (key, value) = parse_assignment(field)?;
        updates.insert(key, value);
    }

    let mut vault = Vault::new(notes_dir);
    let id = vault.resolve(&args.note)?;
    vault
        .update_metadata(&id, &updates)
        .with_context(|| format!("failed to update note: {id}"))?;

    println!("Updated: {id}");
    Ok(())
}

/// Parses `KEY=VALUE`, reading VALUE as a YAML fragment.
///
/// Values of well-known keys must have the matching type; an empty VALUE is
/// accepted for any key and removes it when the note is written.
pub fn parse_assignment(field: &str) -> Result<(String, MetaValue)> {
    let Some((key, raw)) = field.split_once('=') else {
        bail!("expected KEY=VALUE, got '{field}'");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("missing key in '{field}'");
    }

    let value = MetaValue::from_yaml_str(raw)
        .with_context(|| format!("invalid value for '{key}': {raw}"))?;
    if !value.is_blank() {
        check_known_key(key, &value)?;
    }
    Ok((key.to_string(), value))
}

fn check_known_key(key: &str, value: &MetaValue) -> Result<()> {
    let ok = match key {
        keys::TITLE | keys::CATEGORY | keys::CREATED | keys::MODIFIED => value.as_str().is_some(),
        keys::PINNED | keys::ARCHIVED => value.as_bool().is_some(),
        keys::LABELS => match value {
            MetaValue::String(_) => true,
            MetaValue::List(items) => items.iter().all(|item| item.as_str().is_some()),
            _ => false,
        },
        keys::KANBAN_STATUS => {
            let status = value.as_str().unwrap_or_default();
            if let Err(err) = status.parse::<KanbanStatus>() {
                bail!("{err}");
            }
            true
        }
        _ => true,
    };
    if !ok {
        bail!("invalid value for '{key}': {value}");
    }
    Ok(())
}
