use anyhow::Result;
use std::path::Path;

use crate::cli::output::{NoteListing, Output, OutputFormat, TagListing};
use crate::cli::{TaggedArgs, TagsArgs};
use crate::index::{DEFAULT_POPULAR_LIMIT, TagIndex, TagRecord};
use crate::infra::extract_fast;

use super::open_vault;

pub fn handle_tags(args: &TagsArgs, notes_dir: &Path) -> Result<()> {
    let vault = open_vault(notes_dir)?;
    let tags = select_tags(vault.index(), args);

    match args.format {
        OutputFormat::Human => {
            if tags.is_empty() {
                println!("No tags found.");
            }
            for t in &tags {
                if args.counts {
                    println!("{} ({})", t.name, t.count);
                } else {
                    println!("{}", t.name);
                }
            }
        }
        OutputFormat::Json => {
            let listings: Vec<TagListing> = tags
                .into_iter()
                .map(|t| TagListing {
                    name: t.name,
                    color: t.color,
                    count: args.counts.then_some(t.count),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&Output::new(listings))?);
        }
        OutputFormat::Paths => {
            for t in &tags {
                println!("{}", t.name);
            }
        }
    }
    Ok(())
}

/// Applies `--search`, `--limit` and `--popular` to the index.
pub(crate) fn select_tags(index: &TagIndex, args: &TagsArgs) -> Vec<TagRecord> {
    let mut tags = match &args.search {
        Some(query) => index.search_tags(query),
        None => index.all_tags(),
    };
    let limit = if args.popular {
        Some(DEFAULT_POPULAR_LIMIT)
    } else {
        args.limit
    };
    if let Some(limit) = limit {
        tags.truncate(limit);
    }
    tags
}

pub fn handle_tagged(args: &TaggedArgs, notes_dir: &Path) -> Result<()> {
    let vault = open_vault(notes_dir)?;
    let tag = args.tag.trim().trim_start_matches('#');
    let ids = vault.index().notes_with_tag(tag);

    match args.format {
        OutputFormat::Human => {
            if ids.is_empty() {
                println!("No notes tagged #{tag}.");
            }
            for id in &ids {
                println!("{id}");
            }
        }
        OutputFormat::Json => {
            let mut listings = Vec::with_capacity(ids.len());
            for id in ids {
                let path = vault.path_of(&id)?;
                let title = vault
                    .read_content(&id)
                    .ok()
                    .and_then(|content| extract_fast(&content))
                    .and_then(|metadata| metadata.title().map(str::to_string));
                listings.push(NoteListing {
                    id,
                    title,
                    path: path.display().to_string(),
                });
            }
            println!("{}", serde_json::to_string_pretty(&Output::new(listings))?);
        }
        OutputFormat::Paths => {
            for id in &ids {
                println!("{}", vault.path_of(id)?.display());
            }
        }
    }
    Ok(())
}
