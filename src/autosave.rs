//! Debounced, single-flight autosave for one open note.
//!
//! [`AutoSaveCoordinator`] owns the dirty/saving state of an editing session.
//! Every [`mark_dirty`](AutoSaveCoordinator::mark_dirty) restarts a trailing
//! debounce timer; when it expires the save function runs, unless a save is
//! already in flight. [`force_save`](AutoSaveCoordinator::force_save) flushes
//! immediately.
//!
//! Timers are Tokio tasks, so the coordinator must be used inside a runtime.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1000);

/// Message recorded when a save future is dropped before it completes.
const INTERRUPTED: &str = "save was interrupted";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSaveConfig {
    /// Quiet period after the last edit before a save starts.
    pub delay: Duration,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_AUTOSAVE_DELAY,
        }
    }
}

/// Snapshot of the coordinator's state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutoSaveState {
    /// Edits exist that have not been persisted.
    pub dirty: bool,
    pub saving: bool,
    pub last_saved: Option<DateTime<Utc>>,
    /// Message of the most recent failed save; cleared by the next success.
    pub last_error: Option<String>,
}

/// What a call to [`AutoSaveCoordinator::force_save`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed,
    /// Another save was already in flight.
    Skipped,
}

type SaveFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send>>;
type SaveFn = Box<dyn Fn() -> SaveFuture + Send + Sync>;

struct Tracked {
    state: AutoSaveState,
    /// Bumped by every `mark_dirty`; lets a finishing save tell whether edits
    /// arrived while it was running.
    revision: u64,
    timer: Option<CancellationToken>,
    destroyed: bool,
}

struct Inner {
    delay: Duration,
    save: SaveFn,
    tracked: Mutex<Tracked>,
}

/// Coordinates debounced saves of a single document.
///
/// # Examples
///
/// ```
/// use notemaker::autosave::{AutoSaveConfig, AutoSaveCoordinator, SaveOutcome};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let autosave = AutoSaveCoordinator::new(AutoSaveConfig::default(), || async {
///     // write the document somewhere
///     Ok::<(), std::io::Error>(())
/// });
///
/// autosave.mark_dirty();
/// assert!(autosave.is_dirty());
///
/// assert_eq!(autosave.force_save().await, SaveOutcome::Saved);
/// assert!(!autosave.is_dirty());
/// # }
/// ```
pub struct AutoSaveCoordinator {
    inner: Arc<Inner>,
}

impl AutoSaveCoordinator {
    /// Creates a coordinator that persists through `save`.
    ///
    /// Errors returned by `save` are kept as their display text in
    /// [`AutoSaveState::last_error`].
    pub fn new<F, Fut, E>(config: AutoSaveConfig, save: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let save: SaveFn = Box::new(move || {
            let pending = save();
            Box::pin(async move { pending.await.map_err(|err| format!("{err:#}")) })
        });
        Self {
            inner: Arc::new(Inner {
                delay: config.delay,
                save,
                tracked: Mutex::new(Tracked {
                    state: AutoSaveState::default(),
                    revision: 0,
                    timer: None,
                    destroyed: false,
                }),
            }),
        }
    }

    /// Records an edit and restarts the debounce timer.
    ///
    /// After [`destroy`](Self::destroy) the edit is still recorded but no
    /// timer is started.
    pub fn mark_dirty(&self) {
        let token = CancellationToken::new();
        {
            let mut tracked = self.inner.tracked.lock();
            tracked.state.dirty = true;
            tracked.revision += 1;
            if tracked.destroyed {
                return;
            }
            if let Some(previous) = tracked.timer.replace(token.clone()) {
                previous.cancel();
            }
        }

        let deadline = Instant::now() + self.inner.delay;
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = sleep_until(deadline) => {
                    inner.perform_save(true).await;
                }
            }
        });
    }

    /// Saves now.
    ///
    /// Runs even when nothing is dirty. Returns [`SaveOutcome::Skipped`]
    /// without calling the save function if a save is already in flight.
    /// A pending timer stays armed: after a successful save it finds the
    /// note clean and does nothing, after a failure it retries.
    pub async fn force_save(&self) -> SaveOutcome {
        self.inner.perform_save(false).await
    }

    /// Stops automatic saving. Any pending timer is cancelled.
    pub fn destroy(&self) {
        let mut tracked = self.inner.tracked.lock();
        tracked.destroyed = true;
        if let Some(timer) = tracked.timer.take() {
            timer.cancel();
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.inner.tracked.lock().state.dirty
    }

    pub fn is_saving(&self) -> bool {
        self.inner.tracked.lock().state.saving
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.inner.tracked.lock().state.last_saved
    }

    pub fn error(&self) -> Option<String> {
        self.inner.tracked.lock().state.last_error.clone()
    }

    pub fn state(&self) -> AutoSaveState {
        self.inner.tracked.lock().state.clone()
    }
}

impl Drop for AutoSaveCoordinator {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for AutoSaveCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoSaveCoordinator")
            .field("delay", &self.inner.delay)
            .field("state", &self.state())
            .finish()
    }
}

impl Inner {
    async fn perform_save(&self, require_dirty: bool) -> SaveOutcome {
        let revision = {
            let mut tracked = self.tracked.lock();
            if tracked.state.saving || (require_dirty && !tracked.state.dirty) {
                return SaveOutcome::Skipped;
            }
            tracked.state.saving = true;
            tracked.revision
        };

        let mut in_flight = InFlight {
            tracked: &self.tracked,
            finished: false,
        };
        let result = (self.save)().await;
        in_flight.finished = true;

        let mut tracked = self.tracked.lock();
        tracked.state.saving = false;
        match result {
            Ok(()) => {
                if tracked.revision == revision {
                    tracked.state.dirty = false;
                }
                tracked.state.last_saved = Some(Utc::now());
                tracked.state.last_error = None;
                log::debug!("autosave completed");
                SaveOutcome::Saved
            }
            Err(message) => {
                log::warn!("autosave failed: {message}");
                tracked.state.last_error = Some(message);
                SaveOutcome::Failed
            }
        }
    }
}

/// Releases the `saving` flag if a save future is dropped mid-flight.
struct InFlight<'a> {
    tracked: &'a Mutex<Tracked>,
    finished: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let mut tracked = self.tracked.lock();
            tracked.state.saving = false;
            tracked.state.last_error = Some(INTERRUPTED.to_string());
        }
    }
}
