//! Personalization resolver - profile id to system-prompt fragment.

use std::sync::Arc;

use serde_json::json;

use crate::domain::profile::PersonalizationFragment;
use crate::ports::{AgentLogger, ProfileStore, ProfileStoreError};

/// Looks up a profile and renders its personalization fragment.
///
/// Resolution never fails the request: any store error is logged as a
/// warning and the caller proceeds without personalization.
#[derive(Clone)]
pub struct PersonalizationResolver {
    store: Arc<dyn ProfileStore>,
    logger: Option<Arc<dyn AgentLogger>>,
}

impl PersonalizationResolver {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            store,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn AgentLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Returns the fragment for `profile_id`, or `None` when no id is given
    /// or the profile cannot be loaded.
    pub async fn resolve(&self, profile_id: Option<&str>) -> Option<PersonalizationFragment> {
        let id = profile_id.map(str::trim).filter(|id| !id.is_empty())?;

        match self.store.get_profile_by_id(id).await {
            Ok(profile) => Some(PersonalizationFragment::render(&profile)),
            Err(err) => {
                self.warn(id, &err);
                None
            }
        }
    }

    fn warn(&self, id: &str, err: &ProfileStoreError) {
        let reason = if err.is_not_found() {
            "not_found"
        } else {
            "lookup_failed"
        };
        let meta = json!({
            "profileId": id,
            "reason": reason,
            "error": err.to_string(),
        });
        match &self.logger {
            Some(logger) => logger.warn("continuing without personalization", &meta),
            None => tracing::warn!(
                profile_id = %id,
                reason,
                error = %err,
                "continuing without personalization"
            ),
        }
    }
}
