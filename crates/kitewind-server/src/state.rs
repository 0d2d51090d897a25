//! Application state shared by all handlers.
//!
//! [`AppState`] holds the [`SessionService`] behind an `Arc`. The service
//! needs no outer lock: each session's workspace carries its own
//! `tokio::sync::Mutex`, so requests for different sessions never wait on
//! each other.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::llm_provider::{generator_from_config, CodeGenerator};
use crate::service::SessionService;
use crate::session_store::SessionStore;
use crate::transcription::{transcriber_from_config, Transcriber};

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SessionService>,
}

impl AppState {
    /// Builds the state from configuration and starts the idle-session sweep.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: &ServerConfig) -> Self {
        let store = Arc::new(SessionStore::new());
        store.start_expiry_sweep(config.session_ttl);

        let generator = config.llm.as_ref().map(generator_from_config);
        let transcriber = config.stt.as_ref().map(transcriber_from_config);
        if generator.is_none() {
            tracing::warn!("KITEWIND_LLM_PROVIDER not set, code generation disabled");
        }
        if transcriber.is_none() {
            tracing::warn!("KITEWIND_STT_BASE_URL not set, voice input disabled");
        }

        AppState::from_parts(store, generator, transcriber, config)
    }

    /// Creates state with default configuration and no collaborators (for
    /// testing). No sweep task is started.
    pub fn in_memory() -> Result<Self, ApiError> {
        AppState::with_collaborators(None, None)
    }

    /// Creates state with default configuration and the given collaborators.
    pub fn with_collaborators(
        generator: Option<Arc<dyn CodeGenerator>>,
        transcriber: Option<Arc<dyn Transcriber>>,
    ) -> Result<Self, ApiError> {
        let config = ServerConfig::from_lookup(|_| None)
            .map_err(|err| ApiError::InternalError(err.to_string()))?;
        Ok(AppState::from_parts(
            Arc::new(SessionStore::new()),
            generator,
            transcriber,
            &config,
        ))
    }

    fn from_parts(
        store: Arc<SessionStore>,
        generator: Option<Arc<dyn CodeGenerator>>,
        transcriber: Option<Arc<dyn Transcriber>>,
        config: &ServerConfig,
    ) -> Self {
        let service = SessionService::new(
            store,
            generator,
            transcriber,
            config.public_url.clone(),
            config.history_limit,
        );
        AppState {
            service: Arc::new(service),
        }
    }
}
