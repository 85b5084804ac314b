//! Builds the language model client for a configured model name.
//!
//! `claude*` routes to Anthropic; `gpt*`, `o1*`, `o3*` and `o4*` route to
//! OpenAI. Anything else is rejected up front rather than at first call.

use secrecy::ExposeSecret;
use std::sync::Arc;

use super::{AnthropicConfig, AnthropicProvider, OpenAIConfig, OpenAIProvider};
use crate::config::{AiConfig, ModelVendor};
use crate::ports::{AIError, LanguageModelClient};

pub struct ModelRouter;

impl ModelRouter {
    /// Creates the client serving `config.model`.
    ///
    /// # Errors
    ///
    /// - `UnsupportedModel` when no vendor matches the model name
    /// - `AuthenticationFailed` when the matching vendor has no API key
    pub fn client_for(config: &AiConfig) -> Result<Arc<dyn LanguageModelClient>, AIError> {
        let vendor = config
            .vendor()
            .ok_or_else(|| AIError::UnsupportedModel(config.model.clone()))?;

        tracing::info!(model = %config.model, vendor = ?vendor, "Selected language model");

        match vendor {
            ModelVendor::Anthropic => {
                let key = config
                    .anthropic_api_key
                    .as_ref()
                    .ok_or(AIError::AuthenticationFailed)?;
                let mut provider_config = AnthropicConfig::new(key.expose_secret().clone())
                    .with_model(config.model.trim())
                    .with_timeout(config.timeout())
                    .with_max_tokens(config.max_tokens);
                if let Some(url) = &config.anthropic_base_url {
                    provider_config = provider_config.with_base_url(url);
                }
                if let Some(t) = config.temperature {
                    provider_config = provider_config.with_temperature(t);
                }
                Ok(Arc::new(AnthropicProvider::new(provider_config)?))
            }
            ModelVendor::OpenAI => {
                let key = config
                    .openai_api_key
                    .as_ref()
                    .ok_or(AIError::AuthenticationFailed)?;
                let mut provider_config = OpenAIConfig::new(key.expose_secret().clone())
                    .with_model(config.model.trim())
                    .with_timeout(config.timeout())
                    .with_max_tokens(config.max_tokens);
                if let Some(url) = &config.openai_base_url {
                    provider_config = provider_config.with_base_url(url);
                }
                if let Some(t) = config.temperature {
                    provider_config = provider_config.with_temperature(t);
                }
                Ok(Arc::new(OpenAIProvider::new(provider_config)?))
            }
        }
    }
}
