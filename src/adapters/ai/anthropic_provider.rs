//! Anthropic Provider - LanguageModelClient over the Claude Messages API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicConfig::new(api_key)
//!     .with_model("claude-sonnet-4-20250514")
//!     .with_base_url("https://api.anthropic.com");
//!
//! let client = AnthropicProvider::new(config)?;
//! ```
//!
//! One HTTP request per `invoke`. Failures are mapped to `AIError` and
//! returned as-is; there is no retry loop here.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{AIError, InvokeOptions, LanguageModelClient, PromptPayload};

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    api_key: Secret<String>,
    /// Model to use (e.g., "claude-sonnet-4-20250514").
    pub model: String,
    /// Base URL for the API (default: https://api.anthropic.com).
    pub base_url: String,
    /// HTTP client timeout.
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(60),
            max_tokens: 2048,
            temperature: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API client.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    fn to_anthropic_request(&self, payload: PromptPayload) -> AnthropicRequest {
        AnthropicRequest {
            model: self.config.model.clone(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: payload.user_prompt,
            }],
            system: Some(payload.system_prompt).filter(|s| !s.is_empty()),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    async fn send_request(&self, request: &AnthropicRequest) -> Result<Response, AIError> {
        self.client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    async fn handle_response_status(response: Response) -> Result<Response, AIError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(map_error_status(status.as_u16(), &error_body))
    }
}

/// Maps a non-success status and body to an error.
fn map_error_status(status: u16, error_body: &str) -> AIError {
    match status {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(parse_retry_after(error_body)),
        400 if error_body.contains("prompt is too long") => {
            AIError::ContextTooLong(error_body.to_string())
        }
        400 => AIError::InvalidRequest(error_body.to_string()),
        529 => AIError::unavailable(format!("Overloaded: {}", error_body)),
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, error_body)),
        _ => AIError::network(format!("Unexpected status {}: {}", status, error_body)),
    }
}

/// Parses "try again in Ns" from an error body, defaulting to 60 seconds.
fn parse_retry_after(error_body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(error_body)
        .ok()
        .and_then(|parsed| {
            let message = parsed.get("error")?.get("message")?.as_str()?.to_string();
            let idx = message.find("try again in ")?;
            let digits: String = message[idx + 13..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().ok()
        })
        .unwrap_or(60)
}

/// Joins the text blocks of a Messages API response.
fn collect_text(response: AnthropicResponse) -> Result<String, AIError> {
    if response.stop_reason.as_deref() == Some("refusal") {
        return Err(AIError::content_filtered("model refused the request"));
    }

    let content = response
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("");

    if content.trim().is_empty() {
        return Err(AIError::parse("Response contained no text content"));
    }
    Ok(content)
}

#[async_trait]
impl LanguageModelClient for AnthropicProvider {
    async fn invoke(
        &self,
        payload: PromptPayload,
        options: InvokeOptions,
    ) -> Result<String, AIError> {
        tracing::debug!(
            model = %self.config.model,
            metadata = ?options.metadata,
            "Sending Anthropic messages request"
        );

        let request = self.to_anthropic_request(payload);
        let response = self.send_request(&request).await?;
        let response = Self::handle_response_status(response).await?;

        let anthropic_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        collect_text(anthropic_response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

// ----- Anthropic API Types -----

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}
