//! End-to-end integration tests for the KiteWind HTTP API.
//!
//! Tests exercise the full stack: HTTP request -> axum router -> handler ->
//! SessionService -> workspace/history -> HTTP response.
//!
//! Each test builds a fresh AppState. Code generation and speech-to-text are
//! replaced by stubs so no network is touched. Tests use
//! `tower::ServiceExt::oneshot` to send requests directly to the router
//! without starting a network server.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::json;
use tokio::sync::Notify;
use tower::ServiceExt;

use kitewind_core::DemoMode;
use kitewind_server::error::ApiError;
use kitewind_server::llm_provider::CodeGenerator;
use kitewind_server::router::build_router;
use kitewind_server::state::AppState;
use kitewind_server::transcription::Transcriber;

// ---------------------------------------------------------------------------
// Stub collaborators
// ---------------------------------------------------------------------------

/// Replies with a fixed text and records every prompt it receives.
struct StubGenerator {
    reply: Result<String, String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl CodeGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(ApiError::Upstream)
    }
}

/// Signals once a prompt arrives, then holds the reply until released.
struct GatedGenerator {
    reply: String,
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl CodeGenerator for GatedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ApiError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(self.reply.clone())
    }
}

struct StubTranscriber {
    text: String,
}

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<String, ApiError> {
        assert!(!audio.is_empty());
        assert!(file_name.ends_with(".wav") || file_name.ends_with(".webm"));
        Ok(self.text.clone())
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn test_app() -> Router {
    let state = AppState::in_memory().expect("failed to create in-memory AppState");
    build_router(state)
}

/// Router with a generator replying `reply`; returns the prompt log too.
fn app_with_generator(reply: Result<&str, &str>) -> (Router, Arc<Mutex<Vec<String>>>) {
    app_with_transcript(reply, "add a title")
}

/// Like [`app_with_generator`], with the transcriber returning `transcript`.
fn app_with_transcript(
    reply: Result<&str, &str>,
    transcript: &str,
) -> (Router, Arc<Mutex<Vec<String>>>) {
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let generator = StubGenerator {
        reply: reply.map(str::to_string).map_err(str::to_string),
        prompts: Arc::clone(&prompts),
    };
    let transcriber = StubTranscriber {
        text: transcript.to_string(),
    };
    let state = AppState::with_collaborators(Some(Arc::new(generator)), Some(Arc::new(transcriber)))
        .expect("failed to create AppState");
    (build_router(state), prompts)
}

/// Sends a request and returns (status, json).
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap_or(json!(null));
    (status, json)
}

/// Sends a POST request with a JSON body and returns (status, json).
async fn post_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
    )
    .await
}

/// Sends a POST request with a raw audio body.
async fn post_audio(app: &Router, path: &str, audio: &[u8]) -> (StatusCode, serde_json::Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "audio/wav")
            .body(Body::from(audio.to_vec()))
            .unwrap(),
    )
    .await
}

/// Sends a GET request and returns (status, json).
async fn get_json(app: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    send(app, Request::builder().uri(path).body(Body::empty()).unwrap()).await
}

/// Opens a default session and returns its id.
async fn open_session(app: &Router) -> String {
    let (status, body) = post_json(app, "/sessions", json!({})).await;
    assert_eq!(status, StatusCode::OK, "create session failed: {:?}", body);
    body["session_id"].as_str().unwrap().to_string()
}

async fn commit(app: &Router, id: &str, mode: &str, code: &str) -> serde_json::Value {
    let (status, body) = post_json(
        app,
        &format!("/sessions/{}/{}/commit", id, mode),
        json!({ "code": code, "requirements": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "commit failed: {:?}", body);
    body
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app();
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn new_session_starts_from_templates() {
    let app = test_app();
    let (status, body) = post_json(&app, "/sessions", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected"], "gradio");
    assert_eq!(body["gradio"]["code"], DemoMode::Gradio.starting_code());
    assert_eq!(body["streamlit"]["code"], DemoMode::Streamlit.starting_code());
    assert_eq!(body["gradio"]["history_len"], 1);
    assert_eq!(body["gradio"]["can_undo"], false);
}

#[tokio::test]
async fn shared_streamlit_app_selects_streamlit() {
    let app = test_app();
    let (status, body) = post_json(
        &app,
        "/sessions",
        json!({ "type": "streamlit", "code": "import streamlit as st\n", "requirements": "numpy" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected"], "streamlit");
    assert_eq!(body["selected_tab"], 1);
    assert_eq!(body["streamlit"]["code"], "import streamlit as st\n");
    assert_eq!(body["streamlit"]["requirements"], "numpy");
    assert_eq!(body["gradio"]["requirements"], "");
}

#[tokio::test]
async fn unknown_type_falls_back_to_gradio() {
    let app = test_app();
    let (_, body) = post_json(&app, "/sessions", json!({ "type": "shiny", "code": "x = 1\n" })).await;
    assert_eq!(body["selected"], "gradio");
    assert_eq!(body["gradio"]["code"], "x = 1\n");
}

#[tokio::test]
async fn session_restores_from_share_link() {
    let app = test_app();
    let id = open_session(&app).await;
    commit(&app, &id, "streamlit", "st.write('shared')\n").await;
    let (_, share) = get_json(&app, &format!("/sessions/{}/streamlit/share", id)).await;
    let link = share["url"].as_str().unwrap();
    assert!(link.starts_with("http://localhost:7860/?type=streamlit"));

    let (status, body) = post_json(&app, "/sessions", json!({ "link": link })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected"], "streamlit");
    assert_eq!(body["streamlit"]["code"], "st.write('shared')\n");
}

#[tokio::test]
async fn malformed_share_link_is_bad_request() {
    let app = test_app();
    let (status, body) = post_json(&app, "/sessions", json!({ "link": "::not a link" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn deleted_session_is_gone() {
    let app = test_app();
    let id = open_session(&app).await;
    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/sessions/{}", id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_json(&app, &format!("/sessions/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn unknown_session_and_mode_are_not_found() {
    let app = test_app();
    let (status, _) = get_json(&app, "/sessions/not-a-uuid/gradio").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = open_session(&app).await;
    let (status, body) = get_json(&app, &format!("/sessions/{}/shiny", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]["message"].as_str().unwrap().contains("shiny"));
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[tokio::test]
async fn commit_undo_commit_truncates_and_redo_is_noop() {
    let app = test_app();
    let id = open_session(&app).await;
    let base = format!("/sessions/{}/gradio", id);

    let body = commit(&app, &id, "gradio", "v1").await;
    assert_eq!(body["changed"], true);
    assert_eq!(body["cursor"], 1);
    commit(&app, &id, "gradio", "v2").await;

    let (_, nav) = post_json(&app, &format!("{}/undo", base), json!({})).await;
    assert_eq!(nav, json!({ "code": "v1", "cursor": 1, "moved": true }));

    let body = commit(&app, &id, "gradio", "v3").await;
    assert_eq!(body["history_len"], 3);
    assert_eq!(body["cursor"], 2);

    let (_, nav) = post_json(&app, &format!("{}/redo", base), json!({})).await;
    assert_eq!(nav, json!({ "code": "v3", "cursor": 2, "moved": false }));

    let (_, history) = get_json(&app, &format!("{}/history", base)).await;
    let codes: Vec<&str> = history["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec![DemoMode::Gradio.starting_code(), "v1", "v3"]);
    assert_eq!(history["cursor"], 2);
    assert_eq!(history["entries"][2]["current"], true);
}

#[tokio::test]
async fn undo_at_oldest_entry_does_not_move() {
    let app = test_app();
    let id = open_session(&app).await;
    let (status, nav) = post_json(&app, &format!("/sessions/{}/streamlit/undo", id), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(nav["moved"], false);
    assert_eq!(nav["cursor"], 0);
    assert_eq!(nav["code"], DemoMode::Streamlit.starting_code());
}

#[tokio::test]
async fn commit_normalizes_requirements_and_passes_error_through() {
    let app = test_app();
    let id = open_session(&app).await;
    let (status, body) = post_json(
        &app,
        &format!("/sessions/{}/gradio/commit", id),
        json!({
            "code": "import pandas\n",
            "requirements": "pandas\n# plotting\n\nmatplotlib",
            "installed_requirements": ["numpy"],
            "last_error": "ModuleNotFoundError: No module named 'scipy'"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requirements"], "matplotlib\nnumpy\npandas");
    assert_eq!(body["last_error"], "ModuleNotFoundError: No module named 'scipy'");

    let (_, view) = get_json(&app, &format!("/sessions/{}/gradio", id)).await;
    assert_eq!(view["requirements"], "matplotlib\nnumpy\npandas");
    assert_eq!(view["can_undo"], true);

    let body = commit(&app, &id, "gradio", "import pandas\n").await;
    assert_eq!(body["changed"], false);
    assert_eq!(body["last_error"], json!(null));
}

#[tokio::test]
async fn modes_keep_separate_histories() {
    let app = test_app();
    let id = open_session(&app).await;
    commit(&app, &id, "gradio", "g1").await;
    let (_, view) = get_json(&app, &format!("/sessions/{}/streamlit", id)).await;
    assert_eq!(view["history_len"], 1);
    assert_eq!(view["code"], DemoMode::Streamlit.starting_code());
}

// ---------------------------------------------------------------------------
// Assistance
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_places_extracted_code_in_buffer() {
    let (app, prompts) = app_with_generator(Ok("Sure!\n```python\nprint(2)\n```\nEnjoy"));
    let id = open_session(&app).await;
    commit(&app, &id, "gradio", "print(1)\n").await;

    let (status, body) = post_json(
        &app,
        &format!("/sessions/{}/gradio/generate", id),
        json!({ "prompt": "print two instead" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{:?}", body);
    assert_eq!(body["code"], "print(2)\n");
    assert_eq!(body["extracted"], true);
    assert_eq!(
        prompts.lock().unwrap()[0],
        "```python\nprint(1)\n```\nGiven the code above return only updated code for the following request:\nprint two instead\n"
    );

    let (_, view) = get_json(&app, &format!("/sessions/{}/gradio", id)).await;
    assert_eq!(view["code"], "print(2)\n");
    assert_eq!(view["history_len"], 2, "generated code is not committed");
}

#[tokio::test]
async fn generate_without_block_keeps_code() {
    let (app, _) = app_with_generator(Ok("I can't help with that."));
    let id = open_session(&app).await;
    commit(&app, &id, "streamlit", "old").await;

    let (status, body) = post_json(
        &app,
        &format!("/sessions/{}/streamlit/generate", id),
        json!({ "prompt": "do something" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "I can't help with that.");
    assert_eq!(body["code"], "old");
    assert_eq!(body["extracted"], false);
}

#[tokio::test]
async fn upstream_failure_leaves_session_untouched() {
    let (app, _) = app_with_generator(Err("model overloaded"));
    let id = open_session(&app).await;
    commit(&app, &id, "gradio", "keep me").await;

    let (status, body) = post_json(
        &app,
        &format!("/sessions/{}/gradio/generate", id),
        json!({ "prompt": "change it" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");

    let (_, view) = get_json(&app, &format!("/sessions/{}/gradio", id)).await;
    assert_eq!(view["code"], "keep me");
    assert_eq!(view["history_len"], 2);
}

#[tokio::test]
async fn commit_during_generation_wins_over_stale_reply() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let generator = GatedGenerator {
        reply: "```python\nfrom_stale_v1\n```".to_string(),
        entered: Arc::clone(&entered),
        release: Arc::clone(&release),
    };
    let state = AppState::with_collaborators(Some(Arc::new(generator)), None)
        .expect("failed to create AppState");
    let app = build_router(state);
    let id = open_session(&app).await;
    commit(&app, &id, "gradio", "v1").await;

    let pending = {
        let app = app.clone();
        let path = format!("/sessions/{}/gradio/generate", id);
        tokio::spawn(async move { post_json(&app, &path, json!({ "prompt": "rewrite" })).await })
    };
    entered.notified().await;
    commit(&app, &id, "gradio", "v2").await;
    release.notify_one();

    let (status, body) = pending.await.unwrap();
    assert_eq!(status, StatusCode::CONFLICT, "{:?}", body);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (_, view) = get_json(&app, &format!("/sessions/{}/gradio", id)).await;
    assert_eq!(view["code"], "v2");
    assert_eq!(view["history_len"], 3);
}

#[tokio::test]
async fn missing_collaborators_are_unavailable() {
    let app = test_app();
    let id = open_session(&app).await;
    let (status, body) = post_json(
        &app,
        &format!("/sessions/{}/gradio/generate", id),
        json!({ "prompt": "anything" }),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");

    let (status, _) = post_audio(&app, &format!("/sessions/{}/gradio/transcribe", id), b"RIFF").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn voice_transcribes_then_generates() {
    let (app, prompts) = app_with_generator(Ok("```python\nimport gradio as gr\n```"));
    let id = open_session(&app).await;

    let (status, body) = post_audio(
        &app,
        &format!("/sessions/{}/gradio/voice?file_name=clip.webm", id),
        b"\x1aE\xdf\xa3",
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{:?}", body);
    assert_eq!(body["text"], "add a title");
    assert_eq!(body["code"], "import gradio as gr\n");
    assert!(prompts.lock().unwrap()[0].ends_with("request:\nadd a title\n"));
}

#[tokio::test]
async fn silent_recording_is_bad_request() {
    let (app, prompts) = app_with_transcript(Ok("```python\nprint(1)\n```"), "  ");
    let id = open_session(&app).await;

    let (status, body) = post_audio(&app, &format!("/sessions/{}/gradio/voice", id), b"RIFF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("no recognizable speech"));
    assert!(prompts.lock().unwrap().is_empty());

    let (_, view) = get_json(&app, &format!("/sessions/{}/gradio", id)).await;
    assert_eq!(view["code"], DemoMode::Gradio.starting_code());
}

#[tokio::test]
async fn empty_audio_is_bad_request() {
    let (app, _) = app_with_generator(Ok(""));
    let id = open_session(&app).await;
    let (status, _) = post_audio(&app, &format!("/sessions/{}/gradio/transcribe", id), b"").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Share and export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn share_link_carries_mode_code_and_requirements() {
    let app = test_app();
    let id = open_session(&app).await;
    post_json(
        &app,
        &format!("/sessions/{}/gradio/commit", id),
        json!({ "code": "print(1)\n", "requirements": "numpy" }),
    )
    .await;
    let (status, body) = get_json(&app, &format!("/sessions/{}/gradio/share", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["url"],
        "http://localhost:7860/?type=gradio&requirements=numpy&code=print%281%29%0A"
    );
}

#[tokio::test]
async fn export_downloads_standalone_page() {
    let app = test_app();
    let id = open_session(&app).await;
    commit(&app, &id, "streamlit", "st.write(`hi`)\n").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/sessions/{}/streamlit/export", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"stlite-app.html\""
    );
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("st.write(\\`hi\\`)"));
}

#[tokio::test]
async fn snippet_embeds_current_code() {
    let app = test_app();
    let id = open_session(&app).await;
    commit(&app, &id, "gradio", "demo = 1\n").await;
    let (status, body) = get_json(&app, &format!("/sessions/{}/gradio/snippet", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["html"].as_str().unwrap().contains("demo = 1\n"));
}
