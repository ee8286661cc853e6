//! notemaker - markdown notes with YAML headers, tag index and autosave

pub mod autosave;
pub mod cli;
pub mod domain;
pub mod index;
pub mod infra;
pub mod vault;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use cli::{
    Cli, Command,
    config::Config,
    handlers::{handle_capture, handle_new, handle_set, handle_show, handle_tagged, handle_tags},
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let notes_dir = config.notes_dir(cli.dir.as_ref());
    log::debug!("notes directory: {}", notes_dir.display());

    match &cli.command {
        Command::Show(args) => handle_show(args, &notes_dir),
        Command::New(args) => handle_new(args, &notes_dir),
        Command::Set(args) => handle_set(args, &notes_dir),
        Command::Tags(args) => handle_tags(args, &notes_dir),
        Command::Tagged(args) => handle_tagged(args, &notes_dir),
        Command::Capture(args) => handle_capture(args, &notes_dir, &config),
        Command::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "notemaker",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

/// Sets up `env_logger` at a level chosen by `-v`; `RUST_LOG` wins if set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}
