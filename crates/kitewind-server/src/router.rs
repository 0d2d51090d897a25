//! Router assembly for the KiteWind HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Largest accepted request body; recordings are uploaded raw.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax. `{mode}` is `gradio` or
/// `streamlit`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::sessions::health))
        // Sessions
        .route("/sessions", post(handlers::sessions::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::sessions::get_session).delete(handlers::sessions::delete_session),
        )
        .route("/sessions/{id}/{mode}", get(handlers::sessions::get_mode))
        // History
        .route("/sessions/{id}/{mode}/commit", post(handlers::history::commit))
        .route("/sessions/{id}/{mode}/undo", post(handlers::history::undo))
        .route("/sessions/{id}/{mode}/redo", post(handlers::history::redo))
        .route("/sessions/{id}/{mode}/history", get(handlers::history::list_history))
        // Assistance
        .route("/sessions/{id}/{mode}/generate", post(handlers::assist::generate))
        .route("/sessions/{id}/{mode}/transcribe", post(handlers::assist::transcribe))
        .route("/sessions/{id}/{mode}/voice", post(handlers::assist::voice))
        // Share and export
        .route("/sessions/{id}/{mode}/share", get(handlers::export::share))
        .route("/sessions/{id}/{mode}/export", get(handlers::export::export))
        .route("/sessions/{id}/{mode}/snippet", get(handlers::export::snippet))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
