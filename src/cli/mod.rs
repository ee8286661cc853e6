//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::domain::KanbanStatus;
use output::OutputFormat;

/// notemaker - markdown notes with headers, tags and autosave
#[derive(Parser, Debug)]
#[command(name = "notemaker", version, about, long_about = None)]
pub struct Cli {
    /// Notes directory (overrides config file)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a note's metadata and body
    Show(ShowArgs),

    /// Create a new note
    New(NewArgs),

    /// Set metadata fields on a note
    Set(SetArgs),

    /// List tags used in the notes directory
    Tags(TagsArgs),

    /// List notes carrying a tag
    Tagged(TaggedArgs),

    /// Append lines from stdin to a note, saving as you type
    Capture(CaptureArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `show` command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Note path, relative to the notes directory
    pub note: PathBuf,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `new` command
#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Note title
    pub title: String,

    /// Label for the note (can be specified multiple times)
    #[arg(short, long = "label", action = ArgAction::Append)]
    pub labels: Vec<String>,

    /// Category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Kanban status (todo, in-progress, review, done)
    #[arg(short, long)]
    pub status: Option<KanbanStatus>,

    /// Pin the note
    #[arg(short, long)]
    pub pinned: bool,

    /// Initial body (defaults to a heading with the title)
    #[arg(short, long)]
    pub body: Option<String>,
}

/// Arguments for the `set` command
#[derive(Parser, Debug)]
pub struct SetArgs {
    /// Note path, relative to the notes directory
    pub note: PathBuf,

    /// Fields as KEY=VALUE; VALUE is read as YAML (`true`, `3`, `[a, b]`).
    /// An empty VALUE removes the field.
    #[arg(required = true, value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
}

/// Arguments for the `tags` command
#[derive(Parser, Debug)]
pub struct TagsArgs {
    /// Show note counts for each tag
    #[arg(long)]
    pub counts: bool,

    /// Only tags containing this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Show at most this many tags, most used first
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Shorthand for the most used tags (same as --limit 10)
    #[arg(long, conflicts_with = "limit")]
    pub popular: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `tagged` command
#[derive(Parser, Debug)]
pub struct TaggedArgs {
    /// Tag to look up (case-insensitive, with or without `#`)
    pub tag: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `capture` command
#[derive(Parser, Debug)]
pub struct CaptureArgs {
    /// Note path, relative to the notes directory; created if missing
    pub note: PathBuf,

    /// Debounce window in milliseconds (overrides config)
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
