//! OpenAI Provider - LanguageModelClient over the Chat Completions API.
//!
//! Handles `gpt-*` and the `o1`/`o3`/`o4` reasoning families. Reasoning
//! models reject `max_tokens` and `temperature`, so the request switches to
//! `max_completion_tokens` and drops sampling parameters for them.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{AIError, InvokeOptions, LanguageModelClient, PromptPayload};

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-4o", "o3-mini").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
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

    fn is_reasoning_model(&self) -> bool {
        ["o1", "o3", "o4"]
            .iter()
            .any(|prefix| self.model.starts_with(prefix))
    }
}

/// OpenAI Chat Completions client.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn to_openai_request(&self, payload: PromptPayload) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(2);
        if !payload.system_prompt.is_empty() {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: Some(payload.system_prompt),
            });
        }
        messages.push(OpenAIMessage {
            role: "user".to_string(),
            content: Some(payload.user_prompt),
        });

        let reasoning = self.config.is_reasoning_model();
        OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: (!reasoning).then_some(self.config.max_tokens),
            max_completion_tokens: reasoning.then_some(self.config.max_tokens),
            temperature: if reasoning {
                None
            } else {
                self.config.temperature
            },
        }
    }

    async fn send_request(&self, request: &OpenAIRequest) -> Result<Response, AIError> {
        self.client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
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

fn map_error_status(status: u16, error_body: &str) -> AIError {
    match status {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(parse_retry_after(error_body)),
        400 if error_body.contains("maximum context length")
            || error_body.contains("context_length_exceeded") =>
        {
            AIError::ContextTooLong(error_body.to_string())
        }
        400 => AIError::InvalidRequest(error_body.to_string()),
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, error_body)),
        _ => AIError::network(format!("Unexpected status {}: {}", status, error_body)),
    }
}

/// Parses "try again in Ns" from an error body, defaulting to 30 seconds.
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
        .unwrap_or(30)
}

fn first_choice_text(response: OpenAIResponse) -> Result<String, AIError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AIError::parse("No choices in response"))?;

    if choice.finish_reason.as_deref() == Some("content_filter") {
        return Err(AIError::content_filtered("completion blocked by content filter"));
    }

    choice
        .message
        .content
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| AIError::parse("Response contained no text content"))
}

#[async_trait]
impl LanguageModelClient for OpenAIProvider {
    async fn invoke(
        &self,
        payload: PromptPayload,
        options: InvokeOptions,
    ) -> Result<String, AIError> {
        tracing::debug!(
            model = %self.config.model,
            metadata = ?options.metadata,
            "Sending OpenAI chat completion request"
        );

        let request = self.to_openai_request(payload);
        let response = self.send_request(&request).await?;
        let response = Self::handle_response_status(response).await?;

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        first_choice_text(openai_response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(model: &str) -> OpenAIProvider {
        OpenAIProvider::new(
            OpenAIConfig::new("test-key")
                .with_model(model)
                .with_temperature(0.3),
        )
        .unwrap()
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAIConfig::new("test-key")
            .with_model("gpt-4o-mini")
            .with_base_url("https://custom.api.com/v1")
            .with_timeout(Duration::from_secs(10))
            .with_max_tokens(256);

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, "https://custom.api.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn chat_request_has_system_then_user() {
        let request = provider("gpt-4o").to_openai_request(PromptPayload::new("sys", "usr"));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "usr");
        assert_eq!(json["max_tokens"], 2048);
        assert!(json.get("max_completion_tokens").is_none());
        assert!(json.get("temperature").is_some());
    }

    #[test]
    fn reasoning_models_use_completion_token_limit() {
        let request = provider("o3-mini").to_openai_request(PromptPayload::new("sys", "usr"));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["max_completion_tokens"], 2048);
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn maps_status_codes() {
        assert!(matches!(
            map_error_status(401, ""),
            AIError::AuthenticationFailed
        ));
        assert!(matches!(
            map_error_status(429, ""),
            AIError::RateLimited {
                retry_after_secs: 30
            }
        ));
        assert!(matches!(
            map_error_status(400, "context_length_exceeded"),
            AIError::ContextTooLong(_)
        ));
        assert!(matches!(
            map_error_status(502, ""),
            AIError::Unavailable { .. }
        ));
        assert!(matches!(map_error_status(418, ""), AIError::Network(_)));
    }

    #[test]
    fn parses_retry_after_from_message() {
        let body = r#"{"error":{"message":"Please try again in 20s."}}"#;
        assert_eq!(parse_retry_after(body), 20);
    }

    #[test]
    fn extracts_first_choice() {
        let response: OpenAIResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"{}"},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice_text(response).unwrap(), "{}");
    }

    #[test]
    fn null_content_is_a_parse_error() {
        let response: OpenAIResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":null},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert!(matches!(first_choice_text(response), Err(AIError::Parse(_))));
    }

    #[test]
    fn content_filter_is_reported() {
        let response: OpenAIResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":""},"finish_reason":"content_filter"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            first_choice_text(response),
            Err(AIError::ContentFiltered { .. })
        ));
    }

    #[test]
    fn no_choices_is_a_parse_error() {
        let response: OpenAIResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(first_choice_text(response), Err(AIError::Parse(_))));
    }
}
