//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `STEADFAST` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use steadfast::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Using model {}", config.ai.model);
//! ```

mod ai;
mod error;
mod logging;
mod profiles;

pub use ai::{AiConfig, ModelVendor};
pub use error::{ConfigError, ValidationError};
pub use logging::{Environment, LoggingConfig};
pub use profiles::{ProfileBackend, ProfilesConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads successfully;
/// [`AppConfig::validate()`] is what rejects unusable settings such as a
/// missing API key.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Language model selection and credentials
    #[serde(default)]
    pub ai: AiConfig,

    /// Where profiles are read from
    #[serde(default)]
    pub profiles: ProfilesConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `STEADFAST` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `STEADFAST__AI__MODEL=gpt-4o` -> `ai.model = "gpt-4o"`
    /// - `STEADFAST__PROFILES__BASE_DIR=/var/lib/steadfast` -> `profiles.base_dir`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STEADFAST")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.logging.validate()?;
        self.ai.validate()?;
        self.profiles.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}
