//! Session lifecycle request/response types.

use serde::{Deserialize, Serialize};

use kitewind_core::{DemoMode, ModeSession, Workspace};

use crate::session_store::SessionId;

/// Request to open a session.
///
/// The fields mirror the share-link query parameters. When `link` is given,
/// its query parameters are used instead of the other fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// `gradio` or `streamlit`; anything else counts as gradio.
    #[serde(rename = "type", default)]
    pub demo_type: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    /// A full share link to restore from.
    #[serde(default)]
    pub link: Option<String>,
}

/// Current state of one mode.
#[derive(Debug, Clone, Serialize)]
pub struct ModeView {
    pub mode: DemoMode,
    pub code: String,
    pub requirements: String,
    pub last_error: Option<String>,
    pub cursor: usize,
    pub history_len: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl From<&ModeSession> for ModeView {
    fn from(session: &ModeSession) -> Self {
        let history = session.history();
        ModeView {
            mode: session.mode(),
            code: session.code().to_string(),
            requirements: session.requirements().to_string(),
            last_error: session.last_error().map(str::to_string),
            cursor: history.cursor(),
            history_len: history.entries().len(),
            can_undo: history.can_undo(),
            can_redo: history.can_redo(),
        }
    }
}

/// Both modes of a session plus the selected tab.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub session_id: SessionId,
    pub selected: DemoMode,
    /// Zero-based UI tab of `selected`.
    pub selected_tab: usize,
    pub gradio: ModeView,
    pub streamlit: ModeView,
}

impl SessionResponse {
    pub fn new(session_id: SessionId, workspace: &Workspace) -> Self {
        SessionResponse {
            session_id,
            selected: workspace.selected(),
            selected_tab: workspace.selected().tab_index(),
            gradio: workspace.session(DemoMode::Gradio).into(),
            streamlit: workspace.session(DemoMode::Streamlit).into(),
        }
    }
}

/// Response from deleting a session.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteSessionResponse {
    pub success: bool,
}

/// Liveness probe body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
