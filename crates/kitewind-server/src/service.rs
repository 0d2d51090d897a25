//! SessionService: the single coordinator between HTTP handlers, the session
//! store and the code generation / speech-to-text collaborators.
//!
//! Handlers stay thin and delegate here. History operations run under the
//! session's lock. Collaborator calls never hold it: the current code is read,
//! the lock released, the upstream call awaited, and only then is the result
//! applied to the buffer. A failed upstream call leaves the session untouched,
//! and a result computed from code that has since been committed over, undone
//! or redone is rejected with a conflict instead of being applied.

use std::sync::Arc;
use std::time::Instant;

use url::Url;

use kitewind_core::{
    render_app_html, render_snippet, rewrite_prompt, rewrite_result, share_link, DemoMode,
    ExportedApp, ShareParams, Workspace,
};

use crate::error::ApiError;
use crate::llm_provider::CodeGenerator;
use crate::schema::assist::{GenerateResponse, TranscribeResponse, VoiceResponse};
use crate::schema::export::{ShareResponse, SnippetResponse};
use crate::schema::history::{CommitRequest, CommitResponse, HistoryResponse, NavigationResponse};
use crate::schema::sessions::{CreateSessionRequest, DeleteSessionResponse, ModeView, SessionResponse};
use crate::session_store::{SessionId, SessionStore, SharedWorkspace};
use crate::transcription::Transcriber;

const DEFAULT_AUDIO_FILE_NAME: &str = "audio.wav";

pub struct SessionService {
    store: Arc<SessionStore>,
    generator: Option<Arc<dyn CodeGenerator>>,
    transcriber: Option<Arc<dyn Transcriber>>,
    public_url: Url,
    history_limit: Option<usize>,
}

impl SessionService {
    pub fn new(
        store: Arc<SessionStore>,
        generator: Option<Arc<dyn CodeGenerator>>,
        transcriber: Option<Arc<dyn Transcriber>>,
        public_url: Url,
        history_limit: Option<usize>,
    ) -> Self {
        SessionService {
            store,
            generator,
            transcriber,
            public_url,
            history_limit,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Session lifecycle
    // -----------------------------------------------------------------------

    /// Opens a session seeded from share-link parameters.
    pub async fn create_session(
        &self,
        req: CreateSessionRequest,
    ) -> Result<SessionResponse, ApiError> {
        let params = match req.link.as_deref() {
            Some(link) => ShareParams::parse_link(link)?,
            None => ShareParams {
                mode: req.demo_type.as_deref().and_then(|t| t.parse().ok()),
                code: req.code,
                requirements: req.requirements,
            },
        };
        let workspace = Workspace::from_share(&params).with_history_limit(self.history_limit);
        let (id, workspace) = self.store.insert(workspace);
        let workspace = workspace.lock().await;
        tracing::info!(session = %id, selected = %workspace.selected(), "session opened");
        Ok(SessionResponse::new(id, &workspace))
    }

    pub async fn get_session(&self, id: SessionId) -> Result<SessionResponse, ApiError> {
        let workspace = self.workspace(id)?;
        let workspace = workspace.lock().await;
        Ok(SessionResponse::new(id, &workspace))
    }

    pub fn delete_session(&self, id: SessionId) -> Result<DeleteSessionResponse, ApiError> {
        if !self.store.remove(&id) {
            return Err(not_found(id));
        }
        tracing::info!(session = %id, "session closed");
        Ok(DeleteSessionResponse { success: true })
    }

    pub async fn mode_view(&self, id: SessionId, mode: DemoMode) -> Result<ModeView, ApiError> {
        let workspace = self.workspace(id)?;
        let workspace = workspace.lock().await;
        Ok(workspace.session(mode).into())
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    pub async fn commit(
        &self,
        id: SessionId,
        mode: DemoMode,
        req: CommitRequest,
    ) -> Result<CommitResponse, ApiError> {
        let workspace = self.workspace(id)?;
        let mut workspace = workspace.lock().await;
        workspace.select(mode);
        let outcome = workspace.session_mut(mode).commit(
            &req.code,
            &req.requirements,
            &req.installed_requirements,
            req.last_error,
        );
        tracing::debug!(
            session = %id,
            %mode,
            changed = outcome.changed,
            cursor = outcome.cursor,
            len = outcome.history_len,
            "commit"
        );
        Ok(outcome.into())
    }

    pub async fn undo(&self, id: SessionId, mode: DemoMode) -> Result<NavigationResponse, ApiError> {
        let workspace = self.workspace(id)?;
        let mut workspace = workspace.lock().await;
        let nav = workspace.session_mut(mode).undo();
        tracing::debug!(session = %id, %mode, cursor = nav.cursor, moved = nav.moved, "undo");
        Ok(nav.into())
    }

    pub async fn redo(&self, id: SessionId, mode: DemoMode) -> Result<NavigationResponse, ApiError> {
        let workspace = self.workspace(id)?;
        let mut workspace = workspace.lock().await;
        let nav = workspace.session_mut(mode).redo();
        tracing::debug!(session = %id, %mode, cursor = nav.cursor, moved = nav.moved, "redo");
        Ok(nav.into())
    }

    pub async fn history(&self, id: SessionId, mode: DemoMode) -> Result<HistoryResponse, ApiError> {
        let workspace = self.workspace(id)?;
        let workspace = workspace.lock().await;
        Ok(workspace.session(mode).history().into())
    }

    // -----------------------------------------------------------------------
    // Assistance
    // -----------------------------------------------------------------------

    /// Asks the model to rewrite the mode's current code.
    pub async fn generate(
        &self,
        id: SessionId,
        mode: DemoMode,
        prompt: &str,
    ) -> Result<GenerateResponse, ApiError> {
        if prompt.trim().is_empty() {
            return Err(ApiError::BadRequest("prompt must not be empty".to_string()));
        }
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| ApiError::Unavailable("no code generator configured".to_string()))?;
        let workspace = self.workspace(id)?;

        let code = {
            let mut workspace = workspace.lock().await;
            workspace.select(mode);
            workspace.session(mode).code().to_string()
        };

        let started = Instant::now();
        let reply = generator.generate(&rewrite_prompt(&code, prompt)).await?;
        tracing::info!(
            session = %id,
            %mode,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "code generated"
        );

        let result = rewrite_result(&reply, &code);
        {
            let mut workspace = workspace.lock().await;
            let session = workspace.session_mut(mode);
            if session.code() != code {
                tracing::warn!(session = %id, %mode, "code changed during generation, discarding reply");
                return Err(ApiError::Conflict(format!(
                    "{} code changed while the rewrite was generated",
                    mode
                )));
            }
            if result.extracted {
                session.replace_code(result.code.clone());
            } else {
                tracing::warn!(session = %id, %mode, "reply had no python block, keeping code");
            }
        }

        Ok(GenerateResponse {
            reply,
            code: result.code,
            extracted: result.extracted,
        })
    }

    pub async fn transcribe(
        &self,
        id: SessionId,
        audio: Vec<u8>,
        file_name: Option<&str>,
    ) -> Result<TranscribeResponse, ApiError> {
        let transcriber = self
            .transcriber
            .as_ref()
            .ok_or_else(|| ApiError::Unavailable("no speech-to-text backend configured".to_string()))?;
        self.workspace(id)?;
        if audio.is_empty() {
            return Err(ApiError::BadRequest("audio body is empty".to_string()));
        }

        let started = Instant::now();
        let text = transcriber
            .transcribe(audio, file_name.unwrap_or(DEFAULT_AUDIO_FILE_NAME))
            .await?;
        tracing::info!(
            session = %id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "audio transcribed"
        );
        Ok(TranscribeResponse { text })
    }

    /// Transcribes a spoken request and applies it as a rewrite.
    pub async fn voice(
        &self,
        id: SessionId,
        mode: DemoMode,
        audio: Vec<u8>,
        file_name: Option<&str>,
    ) -> Result<VoiceResponse, ApiError> {
        if self.generator.is_none() {
            return Err(ApiError::Unavailable("no code generator configured".to_string()));
        }
        let TranscribeResponse { text } = self.transcribe(id, audio, file_name).await?;
        if text.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "recording contained no recognizable speech".to_string(),
            ));
        }
        let generated = self.generate(id, mode, &text).await?;
        Ok(VoiceResponse {
            text,
            reply: generated.reply,
            code: generated.code,
            extracted: generated.extracted,
        })
    }

    // -----------------------------------------------------------------------
    // Share and export
    // -----------------------------------------------------------------------

    pub async fn share(&self, id: SessionId, mode: DemoMode) -> Result<ShareResponse, ApiError> {
        let workspace = self.workspace(id)?;
        let workspace = workspace.lock().await;
        let session = workspace.session(mode);
        let url = share_link(&self.public_url, mode, session.code(), session.requirements());
        Ok(ShareResponse { url: url.into() })
    }

    pub async fn export(&self, id: SessionId, mode: DemoMode) -> Result<ExportedApp, ApiError> {
        let workspace = self.workspace(id)?;
        let workspace = workspace.lock().await;
        let session = workspace.session(mode);
        Ok(render_app_html(mode, session.code(), session.requirements()))
    }

    pub async fn snippet(&self, id: SessionId, mode: DemoMode) -> Result<SnippetResponse, ApiError> {
        let workspace = self.workspace(id)?;
        let workspace = workspace.lock().await;
        let session = workspace.session(mode);
        Ok(SnippetResponse {
            html: render_snippet(mode, session.code(), session.requirements()),
        })
    }

    fn workspace(&self, id: SessionId) -> Result<SharedWorkspace, ApiError> {
        self.store.get(&id).ok_or_else(|| not_found(id))
    }
}

fn not_found(id: SessionId) -> ApiError {
    ApiError::NotFound(format!("session {} not found", id))
}
