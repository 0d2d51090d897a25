//! Server configuration read from environment variables.
//!
//! Variables:
//! - `KITEWIND_BIND` / `KITEWIND_PORT`: listen address (default `0.0.0.0:7860`)
//! - `KITEWIND_PUBLIC_URL`: base URL for share links
//! - `KITEWIND_SESSION_TTL_SECS`: idle time before a session is dropped
//! - `KITEWIND_HISTORY_LIMIT`: optional cap on history entries per mode
//! - `KITEWIND_LLM_*`: code generation backend (see [`LlmConfig`])
//! - `KITEWIND_STT_*`: speech-to-text backend (see [`SttConfig`])

use std::str::FromStr;
use std::time::Duration;

use url::Url;

const DEFAULT_BIND: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 7860;
const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
const DEFAULT_MAX_NEW_TOKENS: u32 = 512;
const DEFAULT_STT_MODEL: &str = "distil-whisper/distil-medium.en";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{key} is required when {reason}")]
    Missing {
        key: &'static str,
        reason: &'static str,
    },
}

/// Which kind of code generation API to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// Any server exposing `POST {base}/chat/completions`.
    OpenAiCompatible,
    /// OpenRouter's chat completions API.
    OpenRouter,
    /// A hosted text-generation endpoint taking `{"inputs", "parameters"}`.
    TextGeneration,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai_compatible" => Ok(LlmProvider::OpenAiCompatible),
            "openrouter" => Ok(LlmProvider::OpenRouter),
            "text_generation" => Ok(LlmProvider::TextGeneration),
            other => Err(ConfigError::Invalid {
                key: "KITEWIND_LLM_PROVIDER",
                expected: "openai_compatible, openrouter or text_generation",
                value: other.to_string(),
            }),
        }
    }
}

/// Code generation backend settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    /// Only used by [`LlmProvider::TextGeneration`].
    pub max_new_tokens: u32,
}

/// Speech-to-text backend settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SttConfig {
    /// Base of an OpenAI-compatible API; `/audio/transcriptions` is appended.
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub public_url: Url,
    pub session_ttl: Duration,
    /// `None` keeps every revision.
    pub history_limit: Option<usize>,
    pub llm: Option<LlmConfig>,
    pub stt: Option<SttConfig>,
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        ServerConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind = var("KITEWIND_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let port = parse_or("KITEWIND_PORT", var("KITEWIND_PORT"), DEFAULT_PORT, "a port number")?;
        let public_url = match var("KITEWIND_PUBLIC_URL") {
            Some(raw) => Url::parse(&raw).map_err(|_| ConfigError::Invalid {
                key: "KITEWIND_PUBLIC_URL",
                expected: "an absolute URL",
                value: raw,
            })?,
            None => Url::parse(&format!("http://localhost:{}/", port)).map_err(|_| {
                ConfigError::Invalid {
                    key: "KITEWIND_PORT",
                    expected: "a port number",
                    value: port.to_string(),
                }
            })?,
        };
        let ttl_secs = parse_or(
            "KITEWIND_SESSION_TTL_SECS",
            var("KITEWIND_SESSION_TTL_SECS"),
            DEFAULT_SESSION_TTL_SECS,
            "a number of seconds",
        )?;
        let history_limit = var("KITEWIND_HISTORY_LIMIT")
            .map(|raw| {
                parse_value::<usize>("KITEWIND_HISTORY_LIMIT", raw.clone(), "a positive integer")
                    .and_then(|limit| match limit {
                        0 => Err(ConfigError::Invalid {
                            key: "KITEWIND_HISTORY_LIMIT",
                            expected: "a positive integer",
                            value: raw,
                        }),
                        limit => Ok(limit),
                    })
            })
            .transpose()?;

        let llm = match var("KITEWIND_LLM_PROVIDER") {
            Some(raw) => {
                let provider: LlmProvider = raw.parse()?;
                let mut api_key = var("KITEWIND_LLM_API_KEY");
                if api_key.is_none() && provider == LlmProvider::TextGeneration {
                    api_key = var("HF_TOKEN");
                }
                let base_url = var("KITEWIND_LLM_BASE_URL");
                if base_url.is_none() && provider == LlmProvider::OpenAiCompatible {
                    return Err(ConfigError::Missing {
                        key: "KITEWIND_LLM_BASE_URL",
                        reason: "KITEWIND_LLM_PROVIDER is openai_compatible",
                    });
                }
                Some(LlmConfig {
                    provider,
                    base_url,
                    model: var("KITEWIND_LLM_MODEL"),
                    api_key,
                    max_new_tokens: parse_or(
                        "KITEWIND_LLM_MAX_NEW_TOKENS",
                        var("KITEWIND_LLM_MAX_NEW_TOKENS"),
                        DEFAULT_MAX_NEW_TOKENS,
                        "a positive integer",
                    )?,
                })
            }
            None => None,
        };

        let stt = var("KITEWIND_STT_BASE_URL").map(|base_url| SttConfig {
            base_url,
            model: var("KITEWIND_STT_MODEL").unwrap_or_else(|| DEFAULT_STT_MODEL.to_string()),
            api_key: var("KITEWIND_STT_API_KEY"),
        });

        Ok(ServerConfig {
            bind,
            port,
            public_url,
            session_ttl: Duration::from_secs(ttl_secs),
            history_limit,
            llm,
            stt,
        })
    }

    /// `bind:port` for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => parse_value(key, raw, expected),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(
    key: &'static str,
    raw: String,
    expected: &'static str,
) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        expected,
        value: raw,
    })
}
