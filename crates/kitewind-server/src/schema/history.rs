//! Commit, undo/redo and history listing types.

use serde::{Deserialize, Serialize};

use kitewind_core::{CommitOutcome, EditHistory, Navigation};

/// Request to record the code the sandbox just ran.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitRequest {
    pub code: String,
    /// Raw requirements text, `#` comment lines allowed.
    #[serde(default)]
    pub requirements: String,
    /// The sandbox error from this run; omit after a successful run.
    #[serde(default)]
    pub last_error: Option<String>,
    /// Packages the sandbox installed on its own during this run.
    #[serde(default)]
    pub installed_requirements: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitResponse {
    pub requirements: String,
    pub last_error: Option<String>,
    pub cursor: usize,
    pub history_len: usize,
    /// Whether a new history entry was appended.
    pub changed: bool,
}

impl From<CommitOutcome> for CommitResponse {
    fn from(outcome: CommitOutcome) -> Self {
        CommitResponse {
            requirements: outcome.requirements,
            last_error: outcome.last_error,
            cursor: outcome.cursor,
            history_len: outcome.history_len,
            changed: outcome.changed,
        }
    }
}

/// Response from an undo or redo.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationResponse {
    pub code: String,
    pub cursor: usize,
    /// `false` when already at the oldest (undo) or newest (redo) entry.
    pub moved: bool,
}

impl From<Navigation> for NavigationResponse {
    fn from(nav: Navigation) -> Self {
        NavigationResponse {
            code: nav.code,
            cursor: nav.cursor,
            moved: nav.moved,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntryView {
    pub index: usize,
    pub code: String,
    /// Whether the cursor points at this entry.
    pub current: bool,
}

/// The full revision log, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<HistoryEntryView>,
    pub cursor: usize,
}

impl From<&EditHistory> for HistoryResponse {
    fn from(history: &EditHistory) -> Self {
        let cursor = history.cursor();
        HistoryResponse {
            entries: history
                .entries()
                .iter()
                .enumerate()
                .map(|(index, code)| HistoryEntryView {
                    index,
                    code: code.clone(),
                    current: index == cursor,
                })
                .collect(),
            cursor,
        }
    }
}
