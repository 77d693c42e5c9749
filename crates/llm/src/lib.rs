//! Heritage LLM Service
//!
//! The narrative backend port used by the artifacts domain:
//! - `LlmService` trait, one completion call per request
//! - Anthropic Messages API implementation for production
//! - Mock implementation for tests and local development

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod anthropic;
pub mod mock;

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    #[error("LLM request error: {0}")]
    Request(String),

    #[error("LLM response error: {0}")]
    Response(String),

    #[error("LLM rate limit exceeded")]
    RateLimit,
}

/// Message author in a completion request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmRole {
    User,
    Assistant,
}

/// Single message in a completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub content: String,
}

impl LlmMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::User,
            content: content.into(),
        }
    }
}

/// Completion request sent to a backend
///
/// Empty `model` and `None` fields fall back to backend defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub messages: Vec<LlmMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Completion returned by a backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub stop_reason: String,
}

/// LLM service configuration
#[derive(Clone)]
pub struct LlmConfig {
    /// Backend provider (anthropic, mock)
    pub provider: String,
    /// API credential; never logged or echoed in errors
    pub api_key: Option<String>,
    /// Model used when a request does not name one
    pub default_model: String,
    /// Token budget used when a request does not set one
    pub max_tokens: u32,
    /// Override for the provider base URL
    pub base_url: Option<String>,
    /// Upper bound on a single completion call
    pub timeout: Duration,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("default_model", &self.default_model)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            api_key: None,
            default_model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LlmConfig {
    /// Create LLM config from environment variables
    pub fn from_env() -> Result<Self, LlmError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let provider =
            std::env::var("LLM_PROVIDER").unwrap_or_else(|_| defaults.provider.clone());

        let api_key = std::env::var("ANTHROPIC_API_KEY").ok();

        let default_model =
            std::env::var("LLM_MODEL").unwrap_or_else(|_| defaults.default_model.clone());

        let max_tokens = match std::env::var("LLM_MAX_TOKENS") {
            Ok(raw) => raw.parse().map_err(|_| {
                LlmError::Configuration(format!("LLM_MAX_TOKENS must be a number, got {raw:?}"))
            })?,
            Err(_) => defaults.max_tokens,
        };

        let timeout = match std::env::var("LLM_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.parse().map_err(|_| {
                LlmError::Configuration(format!(
                    "LLM_TIMEOUT_SECS must be a number, got {raw:?}"
                ))
            })?),
            Err(_) => defaults.timeout,
        };

        Ok(Self {
            provider,
            api_key,
            default_model,
            max_tokens,
            base_url: std::env::var("LLM_BASE_URL").ok(),
            timeout,
        })
    }

    /// Whether a usable credential is configured
    pub fn has_credential(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Whether the configured provider needs no credential
    pub fn is_mock(&self) -> bool {
        self.provider == "mock"
    }
}

/// Narrative backend port
#[async_trait::async_trait]
pub trait LlmService: Send + Sync {
    /// Run one completion; suspends until the backend answers or fails
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model used when a request leaves `model` empty
    fn default_model(&self) -> &str;
}

/// LLM service factory
pub struct LlmServiceFactory;

impl LlmServiceFactory {
    /// Create LLM service based on configuration
    pub fn create(config: LlmConfig) -> Result<Box<dyn LlmService>, LlmError> {
        match config.provider.as_str() {
            "anthropic" => {
                tracing::info!(model = %config.default_model, "Creating Anthropic LLM service");
                Ok(Box::new(anthropic::AnthropicService::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock LLM service");
                Ok(Box::new(mock::MockLlmService::new()))
            }
            provider => Err(LlmError::Configuration(format!(
                "Unknown LLM provider: {}. Supported providers: anthropic, mock",
                provider
            ))),
        }
    }
}
