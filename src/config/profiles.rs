//! Profile store configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Which profile store backs personalization
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProfileBackend {
    /// YAML files on disk
    #[default]
    Filesystem,
    /// Empty in-memory store, personalization effectively off
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfilesConfig {
    #[serde(default)]
    pub backend: ProfileBackend,

    /// Root directory; profiles live in `{base_dir}/profiles/{id}.yaml`
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

impl ProfilesConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == ProfileBackend::Filesystem && self.base_dir.as_os_str().is_empty() {
            return Err(ValidationError::EmptyProfileDir);
        }
        Ok(())
    }
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            backend: ProfileBackend::default(),
            base_dir: default_base_dir(),
        }
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("./data")
}
