//! Profile Store Port - read access to stored communication profiles.

use async_trait::async_trait;

use crate::domain::foundation::ValidationError;
use crate::domain::profile::Profile;

/// Errors raised while loading a profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileStoreError {
    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Invalid profile id: {0}")]
    InvalidId(#[from] ValidationError),

    #[error("Stored profile is malformed: {0}")]
    Malformed(String),

    #[error("Profile store unavailable: {0}")]
    Unavailable(String),
}

impl ProfileStoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Read-only access to profiles. The core never writes through this port.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Loads a profile by its raw identifier.
    ///
    /// # Errors
    ///
    /// - `InvalidId` if the identifier is malformed
    /// - `NotFound` if no profile exists for a well-formed identifier
    async fn get_profile_by_id(&self, id: &str) -> Result<Profile, ProfileStoreError>;
}
