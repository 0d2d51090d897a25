//! HTTP/JSON API server for KiteWind.
//!
//! Serves per-session edit histories for gradio and streamlit apps, rewrites
//! code through a language model, transcribes voice requests, and renders
//! share links and standalone exports. This crate contains the server
//! framework, API schema types, error handling, configuration, the upstream
//! clients, and route definitions.

pub mod config;
pub mod error;
pub mod handlers;
pub mod llm_provider;
pub mod router;
pub mod schema;
pub mod service;
pub mod session_store;
pub mod state;
pub mod transcription;
