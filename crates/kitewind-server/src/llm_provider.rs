//! Code generation clients.
//!
//! [`CodeGenerator`] is the seam the service calls with a finished rewrite
//! prompt. Two HTTP backends implement it: an OpenAI-compatible chat client
//! and a hosted text-generation client that takes a raw instruct prompt.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use kitewind_core::instruct_wrap;

use crate::config::{LlmConfig, LlmProvider};
use crate::error::ApiError;

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const TEXT_GENERATION_BASE_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_TEXT_GENERATION_MODEL: &str = "HuggingFaceH4/zephyr-7b-beta";

/// Turns a prompt into the model's full reply text.
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;
}

/// Builds the generator described by `llm`.
pub fn generator_from_config(llm: &LlmConfig) -> Arc<dyn CodeGenerator> {
    match llm.provider {
        LlmProvider::OpenAiCompatible | LlmProvider::OpenRouter => {
            Arc::new(ChatCompletionsGenerator::new(llm))
        }
        LlmProvider::TextGeneration => Arc::new(TextGenerationGenerator::new(llm)),
    }
}

/// Client for `POST {base}/chat/completions`.
pub struct ChatCompletionsGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    openrouter: bool,
}

impl ChatCompletionsGenerator {
    pub fn new(llm: &LlmConfig) -> Self {
        let openrouter = llm.provider == LlmProvider::OpenRouter;
        let base_url = match (&llm.base_url, openrouter) {
            (Some(base), _) => base.clone(),
            (None, true) => OPENROUTER_BASE_URL.to_string(),
            (None, false) => String::new(),
        };
        ChatCompletionsGenerator {
            client: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: llm.api_key.clone().unwrap_or_default(),
            model: llm.model.clone().unwrap_or_default(),
            openrouter,
        }
    }
}

#[async_trait]
impl CodeGenerator for ChatCompletionsGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let mut req = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body);
        if self.openrouter {
            req = req.header("X-Title", "KiteWind");
        }

        let body_text = send(req).await?;
        let parsed: ChatCompletionsResponse = serde_json::from_str(&body_text).map_err(|err| {
            ApiError::Upstream(format!("provider response parse failed: {}", err))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ApiError::Upstream("provider response missing assistant content".to_string()))
    }
}

/// Client for a hosted text-generation endpoint.
///
/// The prompt is wrapped in instruct markers and sent as
/// `{"inputs": ..., "parameters": {"max_new_tokens": ...}}`.
pub struct TextGenerationGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    max_new_tokens: u32,
}

impl TextGenerationGenerator {
    pub fn new(llm: &LlmConfig) -> Self {
        let endpoint = match &llm.base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!(
                "{}/{}",
                TEXT_GENERATION_BASE_URL,
                llm.model.as_deref().unwrap_or(DEFAULT_TEXT_GENERATION_MODEL)
            ),
        };
        TextGenerationGenerator {
            client: reqwest::Client::new(),
            endpoint,
            api_key: llm.api_key.clone(),
            max_new_tokens: llm.max_new_tokens,
        }
    }
}

#[async_trait]
impl CodeGenerator for TextGenerationGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let body = json!({
            "inputs": instruct_wrap(prompt),
            "parameters": {
                "max_new_tokens": self.max_new_tokens,
                "return_full_text": false,
            },
        });

        let mut req = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let body_text = send(req).await?;
        parse_generated_text(&body_text)
    }
}

async fn send(req: reqwest::RequestBuilder) -> Result<String, ApiError> {
    let response = req
        .send()
        .await
        .map_err(|err| ApiError::Upstream(format!("provider request failed: {}", err)))?;

    let status = response.status();
    let body_text = response
        .text()
        .await
        .map_err(|err| ApiError::Upstream(format!("provider response read failed: {}", err)))?;

    if !status.is_success() {
        return Err(ApiError::Upstream(format!(
            "provider request failed ({}): {}",
            status, body_text
        )));
    }
    Ok(body_text)
}

/// Accepts both the list form `[{"generated_text": ..}]` and a bare object.
fn parse_generated_text(body_text: &str) -> Result<String, ApiError> {
    let parsed: TextGenerationResponse = serde_json::from_str(body_text).map_err(|err| {
        ApiError::Upstream(format!("provider response parse failed: {}", err))
    })?;
    let output = match parsed {
        TextGenerationResponse::Many(outputs) => outputs.into_iter().next(),
        TextGenerationResponse::One(output) => Some(output),
    };
    output
        .map(|o| o.generated_text)
        .ok_or_else(|| ApiError::Upstream("provider response missing generated text".to_string()))
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatCompletionsChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsChoice {
    message: ChatCompletionsMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextGenerationResponse {
    Many(Vec<TextGenerationOutput>),
    One(TextGenerationOutput),
}

#[derive(Debug, Deserialize)]
struct TextGenerationOutput {
    generated_text: String,
}
