//! Language Model Port - Interface for hosted LLM invocation.
//!
//! The core only ever needs one thing from a model: send a system prompt
//! and a user prompt, get text back. Vendor selection, authentication and
//! wire formats live in the adapters.

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Port for invoking a hosted language model.
#[async_trait]
pub trait LanguageModelClient: Send + Sync {
    /// Sends one prompt pair and returns the raw completion text.
    ///
    /// Called exactly once per agent invocation. Implementations must not
    /// retry internally.
    async fn invoke(&self, payload: PromptPayload, options: InvokeOptions)
        -> Result<String, AIError>;

    /// Identifier of the model behind this client.
    fn model(&self) -> &str;
}

/// The prompt pair sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    pub system_prompt: String,
    pub user_prompt: String,
}

impl PromptPayload {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
        }
    }
}

/// Per-call options. Metadata is passed through for tracing only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvokeOptions {
    pub metadata: Map<String, Value>,
}

impl InvokeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Language model errors.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds the provider asked us to wait.
        retry_after_secs: u32,
    },

    /// Prompt exceeds the model's context window.
    #[error("context too long: {0}")]
    ContextTooLong(String),

    /// Content was filtered for safety.
    #[error("content filtered: {reason}")]
    ContentFiltered { reason: String },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response envelope.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No adapter handles the configured model name.
    #[error("unsupported model: {0}")]
    UnsupportedModel(String),

    /// HTTP client timeout elapsed.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl AIError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// True when the failure came from the provider side rather than
    /// from how we called it.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}
