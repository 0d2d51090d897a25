//! Chat and voice handlers.
//!
//! Audio endpoints take the raw recording as the request body.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;

use crate::error::ApiError;
use crate::handlers::parse_target;
use crate::schema::assist::{
    AudioQuery, GenerateRequest, GenerateResponse, TranscribeResponse, VoiceResponse,
};
use crate::state::AppState;

/// Rewrites the current code from a text request.
///
/// `POST /sessions/{id}/{mode}/generate`
pub async fn generate(
    State(state): State<AppState>,
    Path((id, mode)): Path<(String, String)>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let (id, mode) = parse_target(&id, &mode)?;
    let response = state.service.generate(id, mode, &req.prompt).await?;
    Ok(Json(response))
}

/// Transcribes a recording.
///
/// `POST /sessions/{id}/{mode}/transcribe`
pub async fn transcribe(
    State(state): State<AppState>,
    Path((id, mode)): Path<(String, String)>,
    Query(query): Query<AudioQuery>,
    audio: Bytes,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let (id, _) = parse_target(&id, &mode)?;
    let response = state
        .service
        .transcribe(id, audio.to_vec(), query.file_name.as_deref())
        .await?;
    Ok(Json(response))
}

/// Transcribes a recording and applies it as a rewrite request.
///
/// `POST /sessions/{id}/{mode}/voice`
pub async fn voice(
    State(state): State<AppState>,
    Path((id, mode)): Path<(String, String)>,
    Query(query): Query<AudioQuery>,
    audio: Bytes,
) -> Result<Json<VoiceResponse>, ApiError> {
    let (id, mode) = parse_target(&id, &mode)?;
    let response = state
        .service
        .voice(id, mode, audio.to_vec(), query.file_name.as_deref())
        .await?;
    Ok(Json(response))
}
