//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Unsupported model '{0}': expected a claude, gpt, o1, o3 or o4 model")]
    UnsupportedModel(String),

    #[error("Invalid AI request timeout")]
    InvalidTimeout,

    #[error("Invalid max_tokens")]
    InvalidMaxTokens,

    #[error("Temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),

    #[error("Profile directory must not be empty")]
    EmptyProfileDir,
}
