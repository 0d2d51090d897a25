//! Per-mode editing state and the workspace that groups both modes.
//!
//! A [`ModeSession`] owns the code buffer, its [`EditHistory`], the
//! requirements and the last sandbox error for one mode. A [`Workspace`] holds
//! one independent `ModeSession` per [`DemoMode`]; nothing is shared between
//! them.

use serde::Serialize;

use crate::export::ShareParams;
use crate::history::EditHistory;
use crate::mode::DemoMode;
use crate::requirements::RequirementsSet;

/// What a commit did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitOutcome {
    /// Whether a new history entry was appended.
    pub changed: bool,
    /// Normalized requirements text now stored on the session.
    pub requirements: String,
    pub last_error: Option<String>,
    pub cursor: usize,
    pub history_len: usize,
}

/// Result of an undo or redo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    /// The code now in the buffer.
    pub code: String,
    pub cursor: usize,
    /// `false` when the cursor was already at the boundary.
    pub moved: bool,
}

/// Editing state for one mode.
#[derive(Debug, Clone)]
pub struct ModeSession {
    mode: DemoMode,
    code: String,
    requirements: String,
    last_error: Option<String>,
    history: EditHistory,
}

impl ModeSession {
    /// Starts a session whose history is seeded with `code`.
    pub fn new(mode: DemoMode, code: impl Into<String>, requirements: &str) -> Self {
        let code = code.into();
        ModeSession {
            mode,
            history: EditHistory::new(code.clone()),
            code,
            requirements: requirements.to_string(),
            last_error: None,
        }
    }

    /// Starts a session from the mode's template app.
    pub fn starting(mode: DemoMode) -> Self {
        ModeSession::new(mode, mode.starting_code(), "")
    }

    /// Caps the history at `max_entries` snapshots.
    pub fn with_history_limit(mut self, max_entries: Option<usize>) -> Self {
        if let Some(max) = max_entries {
            self.history.set_max_entries(max);
        }
        self
    }

    pub fn mode(&self) -> DemoMode {
        self.mode
    }

    /// The code buffer, which may be ahead of the history after
    /// [`replace_code`](Self::replace_code).
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn requirements(&self) -> &str {
        &self.requirements
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Sets the buffer without touching the history.
    pub fn replace_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    /// Records the buffer the sandbox just ran.
    ///
    /// `requirements` is the raw text from the requirements field; comment
    /// lines are filtered and the result is stored normalized. Packages the
    /// sandbox installed on its own are passed in `installed` and join the
    /// list. A successful run passes `last_error = None`, which clears any
    /// earlier error.
    pub fn commit(
        &mut self,
        code: &str,
        requirements: &str,
        installed: &[String],
        last_error: Option<String>,
    ) -> CommitOutcome {
        let mut packages = RequirementsSet::from_text(requirements);
        packages.extend(installed.iter().cloned());
        let requirements = packages.to_text();

        let changed = self.history.commit(code);
        self.code = code.to_string();
        self.requirements = requirements.clone();
        self.last_error = last_error.clone();

        CommitOutcome {
            changed,
            requirements,
            last_error,
            cursor: self.history.cursor(),
            history_len: self.history.entries().len(),
        }
    }

    /// Steps the buffer back one revision.
    pub fn undo(&mut self) -> Navigation {
        let moved = match self.history.undo() {
            Some(code) => {
                self.code = code.to_string();
                true
            }
            None => false,
        };
        self.navigation(moved)
    }

    /// Steps the buffer forward one revision.
    pub fn redo(&mut self) -> Navigation {
        let moved = match self.history.redo() {
            Some(code) => {
                self.code = code.to_string();
                true
            }
            None => false,
        };
        self.navigation(moved)
    }

    fn navigation(&self, moved: bool) -> Navigation {
        Navigation {
            code: self.code.clone(),
            cursor: self.history.cursor(),
            moved,
        }
    }
}

/// Both modes' sessions for one browser session.
#[derive(Debug, Clone)]
pub struct Workspace {
    gradio: ModeSession,
    streamlit: ModeSession,
    selected: DemoMode,
}

impl Workspace {
    /// Both modes seeded with their template apps, gradio selected.
    pub fn new() -> Self {
        Workspace {
            gradio: ModeSession::starting(DemoMode::Gradio),
            streamlit: ModeSession::starting(DemoMode::Streamlit),
            selected: DemoMode::Gradio,
        }
    }

    /// Seeds the workspace from share-link parameters.
    ///
    /// The shared code and requirements go to the mode named by `type`; a
    /// missing or unrecognised type counts as gradio. The other mode starts
    /// from its template with no requirements. Empty code falls back to the
    /// template.
    pub fn from_share(params: &ShareParams) -> Self {
        let target = params.mode.unwrap_or(DemoMode::Gradio);
        let code = params
            .code
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| target.starting_code());
        let requirements = params.requirements.as_deref().unwrap_or_default();

        let mut workspace = Workspace::new();
        *workspace.session_mut(target) = ModeSession::new(target, code, requirements);
        workspace.selected = target;
        workspace
    }

    /// Applies a history cap to both modes.
    pub fn with_history_limit(mut self, max_entries: Option<usize>) -> Self {
        self.gradio = self.gradio.with_history_limit(max_entries);
        self.streamlit = self.streamlit.with_history_limit(max_entries);
        self
    }

    pub fn selected(&self) -> DemoMode {
        self.selected
    }

    pub fn select(&mut self, mode: DemoMode) {
        self.selected = mode;
    }

    pub fn session(&self, mode: DemoMode) -> &ModeSession {
        match mode {
            DemoMode::Gradio => &self.gradio,
            DemoMode::Streamlit => &self.streamlit,
        }
    }

    pub fn session_mut(&mut self, mode: DemoMode) -> &mut ModeSession {
        match mode {
            DemoMode::Gradio => &mut self.gradio,
            DemoMode::Streamlit => &mut self.streamlit,
        }
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
