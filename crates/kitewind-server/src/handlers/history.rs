//! History handlers for commit, undo/redo and listing.

use axum::extract::{Path, State};
use axum::Json;

use crate::error::ApiError;
use crate::handlers::parse_target;
use crate::schema::history::{CommitRequest, CommitResponse, HistoryResponse, NavigationResponse};
use crate::state::AppState;

/// Records the code the sandbox just ran.
///
/// `POST /sessions/{id}/{mode}/commit`
pub async fn commit(
    State(state): State<AppState>,
    Path((id, mode)): Path<(String, String)>,
    Json(req): Json<CommitRequest>,
) -> Result<Json<CommitResponse>, ApiError> {
    let (id, mode) = parse_target(&id, &mode)?;
    let response = state.service.commit(id, mode, req).await?;
    Ok(Json(response))
}

/// Steps back one revision.
///
/// `POST /sessions/{id}/{mode}/undo`
pub async fn undo(
    State(state): State<AppState>,
    Path((id, mode)): Path<(String, String)>,
) -> Result<Json<NavigationResponse>, ApiError> {
    let (id, mode) = parse_target(&id, &mode)?;
    let response = state.service.undo(id, mode).await?;
    Ok(Json(response))
}

/// Steps forward one revision.
///
/// `POST /sessions/{id}/{mode}/redo`
pub async fn redo(
    State(state): State<AppState>,
    Path((id, mode)): Path<(String, String)>,
) -> Result<Json<NavigationResponse>, ApiError> {
    let (id, mode) = parse_target(&id, &mode)?;
    let response = state.service.redo(id, mode).await?;
    Ok(Json(response))
}

/// Lists the revision log.
///
/// `GET /sessions/{id}/{mode}/history`
pub async fn list_history(
    State(state): State<AppState>,
    Path((id, mode)): Path<(String, String)>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let (id, mode) = parse_target(&id, &mode)?;
    let response = state.service.history(id, mode).await?;
    Ok(Json(response))
}
