//! Kanban status of a note.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Column a note sits in on the kanban board.
///
/// Stored in the header under `kanban-status` as one of `todo`,
/// `in-progress`, `review` or `done`.
///
/// # Examples
///
/// ```
/// use notemaker::domain::KanbanStatus;
///
/// let status: KanbanStatus = "in-progress".parse().unwrap();
/// assert_eq!(status, KanbanStatus::InProgress);
/// assert_eq!(status.to_string(), "in-progress");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KanbanStatus {
    Todo,
    InProgress,
    Review,
    Done,
}

/// Error returned when parsing an unknown kanban status.
#[derive(Debug, Clone, Error)]
#[error("invalid kanban status '{0}': expected one of todo, in-progress, review, done")]
pub struct ParseKanbanStatusError(String);

impl KanbanStatus {
    pub const ALL: [KanbanStatus; 4] = [
        KanbanStatus::Todo,
        KanbanStatus::InProgress,
        KanbanStatus::Review,
        KanbanStatus::Done,
    ];

    /// Returns the header spelling of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            KanbanStatus::Todo => "todo",
            KanbanStatus::InProgress => "in-progress",
            KanbanStatus::Review => "review",
            KanbanStatus::Done => "done",
        }
    }
}

impl fmt::Display for KanbanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KanbanStatus {
    type Err = ParseKanbanStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KanbanStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| ParseKanbanStatusError(s.to_string()))
    }
}
