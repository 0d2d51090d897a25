//! Session lifecycle handlers (open, view, close) and the health probe.

use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::handlers::{parse_session_id, parse_target};
use crate::schema::sessions::{
    CreateSessionRequest, DeleteSessionResponse, HealthResponse, ModeView, SessionResponse,
};
use crate::state::AppState;

/// Opens a session, optionally restoring a shared app.
///
/// `POST /sessions`
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let response = state.service.create_session(req).await?;
    Ok(Json(response))
}

/// Returns both modes of a session.
///
/// `GET /sessions/{id}`
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let id = parse_session_id(&id)?;
    let response = state.service.get_session(id).await?;
    Ok(Json(response))
}

/// Closes a session.
///
/// `DELETE /sessions/{id}`
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteSessionResponse>, ApiError> {
    let id = parse_session_id(&id)?;
    let response = state.service.delete_session(id)?;
    Ok(Json(response))
}

/// Returns one mode of a session.
///
/// `GET /sessions/{id}/{mode}`
pub async fn get_mode(
    State(state): State<AppState>,
    Path((id, mode)): Path<(String, String)>,
) -> Result<Json<ModeView>, ApiError> {
    let (id, mode) = parse_target(&id, &mode)?;
    let response = state.service.mode_view(id, mode).await?;
    Ok(Json(response))
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
