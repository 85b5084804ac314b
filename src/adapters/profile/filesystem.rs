//! Filesystem profile store backed by YAML files.
//!
//! Layout: `{base_dir}/profiles/{profile_id}.yaml`

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::ProfileId;
use crate::domain::profile::Profile;
use crate::ports::{ProfileStore, ProfileStoreError};

/// Filesystem-based profile store
pub struct FsProfileStore {
    base_dir: PathBuf,
}

impl FsProfileStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn profiles_dir(&self) -> PathBuf {
        self.base_dir.join("profiles")
    }

    fn file_path(&self, id: &ProfileId) -> PathBuf {
        self.profiles_dir().join(format!("{}.yaml", id))
    }

    /// Writes a profile, replacing any existing file atomically.
    ///
    /// Provisioning helper; the agent pipeline only reads.
    pub async fn save(&self, profile: &Profile) -> Result<PathBuf, ProfileStoreError> {
        profile
            .validate()
            .map_err(|e| ProfileStoreError::Malformed(e.to_string()))?;

        let file_path = self.file_path(&profile.id);
        fs::create_dir_all(self.profiles_dir())
            .await
            .map_err(|e| ProfileStoreError::Unavailable(format!("Failed to create directory: {}", e)))?;

        let content = serde_yaml::to_string(profile)
            .map_err(|e| ProfileStoreError::Malformed(format!("Failed to serialize profile: {}", e)))?;

        let temp_path = file_path.with_extension("tmp");
        fs::write(&temp_path, content)
            .await
            .map_err(|e| ProfileStoreError::Unavailable(format!("Failed to write temporary file: {}", e)))?;
        fs::rename(&temp_path, &file_path)
            .await
            .map_err(|e| ProfileStoreError::Unavailable(format!("Failed to rename file: {}", e)))?;

        Ok(file_path)
    }
}

#[async_trait]
impl ProfileStore for FsProfileStore {
    async fn get_profile_by_id(&self, id: &str) -> Result<Profile, ProfileStoreError> {
        let profile_id = ProfileId::parse(id)?;
        let file_path = self.file_path(&profile_id);

        let content = match fs::read_to_string(&file_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProfileStoreError::NotFound(profile_id.to_string()));
            }
            Err(e) => {
                return Err(ProfileStoreError::Unavailable(format!(
                    "Failed to read {}: {}",
                    file_path.display(),
                    e
                )));
            }
        };

        let profile: Profile = serde_yaml::from_str(&content)
            .map_err(|e| ProfileStoreError::Malformed(format!("{}: {}", file_path.display(), e)))?;

        if profile.id != profile_id {
            return Err(ProfileStoreError::Malformed(format!(
                "{} contains profile {}",
                file_path.display(),
                profile.id
            )));
        }
        profile
            .validate()
            .map_err(|e| ProfileStoreError::Malformed(e.to_string()))?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::Tone;
    use tempfile::TempDir;

    fn sample_profile() -> Profile {
        Profile::new(ProfileId::new(), "Sam")
            .with_tone(Tone::Informative)
            .with_triggers(vec!["loud rooms".to_string()])
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(temp_dir.path());
        let profile = sample_profile();

        let path = store.save(&profile).await.unwrap();
        assert!(path.ends_with(format!("profiles/{}.yaml", profile.id)));

        let loaded = store.get_profile_by_id(&profile.id.to_string()).await.unwrap();
        assert_eq!(loaded, profile);
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(temp_dir.path());

        let result = store.get_profile_by_id(&ProfileId::new().to_string()).await;
        assert!(matches!(result, Err(ProfileStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_malformed_id_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(temp_dir.path());

        let result = store.get_profile_by_id("../../etc/passwd").await;
        assert!(matches!(result, Err(ProfileStoreError::InvalidId(_))));
    }

    #[tokio::test]
    async fn test_reads_hand_written_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(temp_dir.path());
        let id = ProfileId::new();

        let yaml = format!(
            "id: {}\npreferredName: Alex\ncommunicationGuidelines:\n  tone: direct\n  avoidPhrases:\n    - calm down\n",
            id
        );
        std::fs::create_dir_all(temp_dir.path().join("profiles")).unwrap();
        std::fs::write(
            temp_dir.path().join("profiles").join(format!("{}.yaml", id)),
            yaml,
        )
        .unwrap();

        let profile = store.get_profile_by_id(&id.to_string()).await.unwrap();
        assert_eq!(profile.preferred_name, "Alex");
        assert_eq!(profile.communication_guidelines.tone, Tone::Direct);
        assert_eq!(profile.communication_guidelines.avoid_phrases, vec!["calm down"]);
    }

    #[tokio::test]
    async fn test_garbage_file_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(temp_dir.path());
        let id = ProfileId::new();

        std::fs::create_dir_all(temp_dir.path().join("profiles")).unwrap();
        std::fs::write(
            temp_dir.path().join("profiles").join(format!("{}.yaml", id)),
            "preferredName: [unclosed",
        )
        .unwrap();

        let result = store.get_profile_by_id(&id.to_string()).await;
        assert!(matches!(result, Err(ProfileStoreError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_mismatched_id_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(temp_dir.path());
        let profile = sample_profile();
        let other = ProfileId::new();

        store.save(&profile).await.unwrap();
        std::fs::rename(
            temp_dir.path().join("profiles").join(format!("{}.yaml", profile.id)),
            temp_dir.path().join("profiles").join(format!("{}.yaml", other)),
        )
        .unwrap();

        let result = store.get_profile_by_id(&other.to_string()).await;
        assert!(matches!(result, Err(ProfileStoreError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_profile() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsProfileStore::new(temp_dir.path());
        let profile = Profile::new(ProfileId::new(), " ");

        assert!(matches!(
            store.save(&profile).await,
            Err(ProfileStoreError::Malformed(_))
        ));
    }
}
