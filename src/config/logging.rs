//! Logging configuration

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use super::error::ValidationError;

/// Application environment
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `steadfast=debug,reqwest=warn`
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines; defaults to on in production
    pub json: Option<bool>,
}

impl LoggingConfig {
    /// Whether to emit JSON formatted logs in the given environment
    pub fn use_json(&self, environment: Environment) -> bool {
        self.json
            .unwrap_or(environment == Environment::Production)
    }

    /// Build the subscriber filter
    pub fn env_filter(&self) -> Result<EnvFilter, ValidationError> {
        EnvFilter::try_new(&self.level)
            .map_err(|e| ValidationError::InvalidLogFilter(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.env_filter().map(|_| ())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_follows_environment() {
        let config = LoggingConfig::default();
        assert!(!config.use_json(Environment::Development));
        assert!(config.use_json(Environment::Production));
    }

    #[test]
    fn test_explicit_json_wins() {
        let config = LoggingConfig {
            json: Some(true),
            ..Default::default()
        };
        assert!(config.use_json(Environment::Development));
    }

    #[test]
    fn test_filter_validation() {
        let config = LoggingConfig {
            level: "steadfast=debug,reqwest=warn".to_string(),
            json: None,
        };
        assert!(config.validate().is_ok());

        let config = LoggingConfig {
            level: "steadfast=[".to_string(),
            json: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidLogFilter(_))
        ));
    }
}
