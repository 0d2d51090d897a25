//! Chat and voice assistance types.

use serde::{Deserialize, Serialize};

/// Request to rewrite the current code.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    /// What to change, in plain language.
    pub prompt: String,
}

/// Result of a rewrite.
///
/// `code` is now in the mode's buffer but not committed; the client commits
/// it after the sandbox has run it.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    /// The model's full reply, shown as chat text.
    pub reply: String,
    pub code: String,
    /// `false` when the reply had no python block and the code is unchanged.
    pub extracted: bool,
}

/// Query parameters for audio uploads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AudioQuery {
    /// Name forwarded to the speech-to-text backend; its extension picks the
    /// audio MIME type.
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

/// Transcription followed by a rewrite.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceResponse {
    pub text: String,
    pub reply: String,
    pub code: String,
    pub extracted: bool,
}
