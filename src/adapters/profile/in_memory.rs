//! In-memory profile store for tests and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::ProfileId;
use crate::domain::profile::Profile;
use crate::ports::{ProfileStore, ProfileStoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: Arc<RwLock<HashMap<ProfileId, Profile>>>,
    /// When set, every lookup fails with `Unavailable`.
    unavailable: Option<String>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every lookup fails, for exercising degraded paths.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            profiles: Arc::default(),
            unavailable: Some(message.into()),
        }
    }

    pub async fn insert(&self, profile: Profile) {
        self.profiles.write().await.insert(profile.id, profile);
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile_by_id(&self, id: &str) -> Result<Profile, ProfileStoreError> {
        if let Some(message) = &self.unavailable {
            return Err(ProfileStoreError::Unavailable(message.clone()));
        }

        let profile_id = ProfileId::parse(id)?;
        self.profiles
            .read()
            .await
            .get(&profile_id)
            .cloned()
            .ok_or_else(|| ProfileStoreError::NotFound(profile_id.to_string()))
    }
}
