//! Share-link and export types.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ShareResponse {
    pub url: String,
}

/// Embeddable HTML for the app.
#[derive(Debug, Clone, Serialize)]
pub struct SnippetResponse {
    pub html: String,
}
