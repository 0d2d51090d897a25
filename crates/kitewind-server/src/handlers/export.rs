//! Share-link and export handlers.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ApiError;
use crate::handlers::parse_target;
use crate::schema::export::{ShareResponse, SnippetResponse};
use crate::state::AppState;

/// `GET /sessions/{id}/{mode}/share`
pub async fn share(
    State(state): State<AppState>,
    Path((id, mode)): Path<(String, String)>,
) -> Result<Json<ShareResponse>, ApiError> {
    let (id, mode) = parse_target(&id, &mode)?;
    let response = state.service.share(id, mode).await?;
    Ok(Json(response))
}

/// Downloads the app as a standalone HTML page.
///
/// `GET /sessions/{id}/{mode}/export`
pub async fn export(
    State(state): State<AppState>,
    Path((id, mode)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let (id, mode) = parse_target(&id, &mode)?;
    let app = state.service.export(id, mode).await?;
    let disposition = format!("attachment; filename=\"{}\"", app.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        app.html,
    )
        .into_response())
}

/// `GET /sessions/{id}/{mode}/snippet`
pub async fn snippet(
    State(state): State<AppState>,
    Path((id, mode)): Path<(String, String)>,
) -> Result<Json<SnippetResponse>, ApiError> {
    let (id, mode) = parse_target(&id, &mode)?;
    let response = state.service.snippet(id, mode).await?;
    Ok(Json(response))
}
