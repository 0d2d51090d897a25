//! Speech-to-text for voice requests.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::config::SttConfig;
use crate::error::ApiError;

/// Turns recorded audio into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<String, ApiError>;
}

pub fn transcriber_from_config(stt: &SttConfig) -> Arc<dyn Transcriber> {
    Arc::new(WhisperApiTranscriber::new(stt))
}

/// Posts audio as multipart form data to an OpenAI-compatible
/// `/audio/transcriptions` endpoint.
pub struct WhisperApiTranscriber {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl WhisperApiTranscriber {
    pub fn new(stt: &SttConfig) -> Self {
        WhisperApiTranscriber {
            client: reqwest::Client::new(),
            endpoint: format!("{}/audio/transcriptions", stt.base_url.trim_end_matches('/')),
            model: stt.model.clone(),
            api_key: stt.api_key.clone(),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperApiTranscriber {
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<String, ApiError> {
        let part = multipart::Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str(audio_mime(file_name))
            .map_err(|err| ApiError::InternalError(format!("audio part: {}", err)))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        let mut req = self.client.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req
            .send()
            .await
            .map_err(|err| ApiError::Upstream(format!("transcription request failed: {}", err)))?;
        let status = response.status();
        let body_text = response.text().await.map_err(|err| {
            ApiError::Upstream(format!("transcription response read failed: {}", err))
        })?;
        if !status.is_success() {
            return Err(ApiError::Upstream(format!(
                "transcription request failed ({}): {}",
                status, body_text
            )));
        }

        let parsed: TranscriptionResponse = serde_json::from_str(&body_text).map_err(|err| {
            ApiError::Upstream(format!("transcription response parse failed: {}", err))
        })?;
        Ok(parsed.text.unwrap_or_default().trim().to_string())
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
}

/// MIME type for an uploaded recording, from its file extension.
pub fn audio_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "webm" => "audio/webm",
        "m4a" | "mp4" => "audio/mp4",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}
