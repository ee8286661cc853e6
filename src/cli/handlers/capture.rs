use anyhow::{Context, Result, bail};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::autosave::{AutoSaveConfig, AutoSaveCoordinator, SaveOutcome};
use crate::cli::CaptureArgs;
use crate::cli::config::Config;
use crate::domain::Metadata;
use crate::infra::{FsError, create_new, read_note_content, update, write_note_content};
use crate::vault::Vault;

/// Pause between flush attempts while a debounced save is still running.
const FLUSH_RETRY: Duration = Duration::from_millis(10);

pub fn handle_capture(args: &CaptureArgs, notes_dir: &Path, config: &Config) -> Result<()> {
    let vault = Vault::new(notes_dir);
    let id = vault.resolve(&args.note)?;
    let path = vault.path_of(&id)?;

    let initial = match read_note_content(&path) {
        Ok(content) => content,
        Err(FsError::NotFound { .. }) => create_new(&title_from_id(&id), None, None),
        Err(err) => return Err(err).with_context(|| format!("failed to read note: {id}")),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let lines = runtime.block_on(capture(
        path,
        initial,
        config.autosave(args.delay_ms),
        tokio::io::stdin(),
    ))?;

    println!("Captured {lines} lines into {id}");
    Ok(())
}

/// Appends each input line to the note body, saving through an
/// [`AutoSaveCoordinator`] and flushing once the input ends.
///
/// Every save stamps `modified`. Returns the number of lines captured.
pub(crate) async fn capture<R>(
    path: PathBuf,
    initial: String,
    config: AutoSaveConfig,
    input: R,
) -> Result<usize>
where
    R: AsyncRead + Unpin,
{
    let buffer = Arc::new(Mutex::new(initial));
    let autosave = {
        let buffer = Arc::clone(&buffer);
        AutoSaveCoordinator::new(config, move || {
            let content = update(&buffer.lock(), &Metadata::new());
            let path = path.clone();
            async move {
                tokio::task::spawn_blocking(move || write_note_content(&path, &content))
                    .await
                    .context("save task failed")??;
                Ok::<(), anyhow::Error>(())
            }
        })
    };

    let mut lines = BufReader::new(input).lines();
    let mut count = 0;
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        append_line(&mut buffer.lock(), &line);
        autosave.mark_dirty();
        count += 1;
    }

    loop {
        match autosave.force_save().await {
            SaveOutcome::Saved => break,
            SaveOutcome::Skipped => tokio::time::sleep(FLUSH_RETRY).await,
            SaveOutcome::Failed => {
                bail!(
                    "failed to save note: {}",
                    autosave.error().unwrap_or_default()
                );
            }
        }
    }
    autosave.destroy();
    Ok(count)
}

pub(crate) fn append_line(buffer: &mut String, line: &str) {
    if !buffer.is_empty() && !buffer.ends_with('\n') {
        buffer.push('\n');
    }
    buffer.push_str(line);
    buffer.push('\n');
}

fn title_from_id(id: &str) -> String {
    Path::new(id)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| id.to_string())
}
