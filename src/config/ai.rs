//! Language model configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Language model configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Model name; the prefix selects the vendor
    #[serde(default = "default_model")]
    pub model: String,

    /// OpenAI API key
    pub openai_api_key: Option<Secret<String>>,

    /// Anthropic API key
    pub anthropic_api_key: Option<Secret<String>>,

    /// Override for the OpenAI base URL
    pub openai_base_url: Option<String>,

    /// Override for the Anthropic base URL
    pub anthropic_base_url: Option<String>,

    /// HTTP client timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Completion token limit
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,
}

/// Vendor that serves a model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelVendor {
    Anthropic,
    OpenAI,
}

impl ModelVendor {
    /// Picks the vendor from a model name prefix.
    pub fn for_model(model: &str) -> Option<Self> {
        let model = model.trim().to_ascii_lowercase();
        if model.starts_with("claude") {
            Some(Self::Anthropic)
        } else if ["gpt", "o1", "o3", "o4"]
            .iter()
            .any(|prefix| model.starts_with(prefix))
        {
            Some(Self::OpenAI)
        } else {
            None
        }
    }
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        has_key(&self.openai_api_key)
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        has_key(&self.anthropic_api_key)
    }

    /// Vendor serving the configured model
    pub fn vendor(&self) -> Option<ModelVendor> {
        ModelVendor::for_model(&self.model)
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.vendor() {
            Some(ModelVendor::Anthropic) if !self.has_anthropic() => {
                return Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"));
            }
            Some(ModelVendor::OpenAI) if !self.has_openai() => {
                return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
            }
            None => return Err(ValidationError::UnsupportedModel(self.model.clone())),
            _ => {}
        }

        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ValidationError::InvalidTemperature);
            }
        }
        Ok(())
    }
}

fn has_key(key: &Option<Secret<String>>) -> bool {
    key.as_ref()
        .is_some_and(|k| !k.expose_secret().trim().is_empty())
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            openai_api_key: None,
            anthropic_api_key: None,
            openai_base_url: None,
            anthropic_base_url: None,
            timeout_secs: default_timeout(),
            max_tokens: default_max_tokens(),
            temperature: None,
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    2048
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: &str) -> Option<Secret<String>> {
        Some(Secret::new(value.to_string()))
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert!(config.model.starts_with("claude"));
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_vendor_from_prefix() {
        assert_eq!(
            ModelVendor::for_model("claude-3-haiku"),
            Some(ModelVendor::Anthropic)
        );
        assert_eq!(ModelVendor::for_model("gpt-4o"), Some(ModelVendor::OpenAI));
        assert_eq!(ModelVendor::for_model("o3-mini"), Some(ModelVendor::OpenAI));
        assert_eq!(ModelVendor::for_model("o4-mini"), Some(ModelVendor::OpenAI));
        assert_eq!(ModelVendor::for_model("llama-3"), None);
    }

    #[test]
    fn test_validation_requires_key_for_vendor() {
        let config = AiConfig {
            openai_api_key: key("sk-xxx"),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))
        );
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = AiConfig {
            anthropic_api_key: key("  "),
            ..Default::default()
        };
        assert!(!config.has_anthropic());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_model() {
        let config = AiConfig {
            model: "mistral-large".to_string(),
            anthropic_api_key: key("sk-ant-xxx"),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::UnsupportedModel(_))
        ));
    }

    #[test]
    fn test_validation_bounds() {
        let base = AiConfig {
            anthropic_api_key: key("sk-ant-xxx"),
            ..Default::default()
        };
        assert!(base.validate().is_ok());

        let config = AiConfig {
            timeout_secs: 0,
            ..base.clone()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));

        let config = AiConfig {
            temperature: Some(3.0),
            ..base.clone()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTemperature));

        let config = AiConfig {
            max_tokens: 0,
            ..base
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidMaxTokens));
    }

    #[test]
    fn test_openai_model_valid_with_openai_key() {
        let config = AiConfig {
            model: "gpt-4o".to_string(),
            openai_api_key: key("sk-xxx"),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
