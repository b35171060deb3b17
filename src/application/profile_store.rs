//! ProfileStore - whole-document load/save of the user profile.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::foundation::Locale;
use crate::domain::profile::{FieldUpdate, UserProfile};
use crate::ports::{ProfileStorage, StorageError};

/// Errors raised while persisting the profile.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("profile storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to serialize profile: {0}")]
    Serialization(String),
}

/// Loads and saves the profile through a [`ProfileStorage`] backend.
pub struct ProfileStore {
    storage: Arc<dyn ProfileStorage>,
    locale: Locale,
}

impl ProfileStore {
    pub fn new(storage: Arc<dyn ProfileStorage>, locale: Locale) -> Self {
        Self { storage, locale }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn location(&self) -> String {
        self.storage.location()
    }

    /// Loads the stored profile.
    ///
    /// A missing or unreadable document yields an empty profile; only
    /// backend failures are errors.
    pub async fn load(&self) -> Result<UserProfile, ProfileError> {
        let Some(content) = self.storage.read().await? else {
            tracing::debug!(location = %self.storage.location(), "No stored profile");
            return Ok(UserProfile::default());
        };

        match serde_json::from_str::<UserProfile>(&content) {
            Ok(profile) => Ok(profile),
            Err(e) => {
                tracing::warn!(
                    location = %self.storage.location(),
                    error = %e,
                    "Stored profile is corrupt, starting from an empty profile"
                );
                Ok(UserProfile::default())
            }
        }
    }

    /// Stamps `updated_at` and writes the profile as pretty JSON.
    pub async fn save(&self, profile: &mut UserProfile) -> Result<(), ProfileError> {
        profile.touch();
        let content = serde_json::to_string_pretty(profile)
            .map_err(|e| ProfileError::Serialization(e.to_string()))?;
        self.storage.write(&content).await?;

        tracing::info!(location = %self.storage.location(), "Profile saved");
        Ok(())
    }

    /// Replaces the stored profile with an empty one.
    pub async fn clear(&self) -> Result<(), ProfileError> {
        let mut profile = UserProfile::new();
        self.save(&mut profile).await
    }

    /// True when a profile with usable data is stored.
    pub async fn profile_exists(&self) -> bool {
        match self.load().await {
            Ok(profile) => profile.has_data(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not check for a stored profile");
                false
            }
        }
    }

    /// Sets one attribute by name and saves.
    pub async fn update_field(
        &self,
        name: &str,
        value: Value,
    ) -> Result<UserProfile, ProfileError> {
        let mut profile = self.load().await?;
        if profile.apply_field(name, value) == FieldUpdate::Additional {
            tracing::debug!(field = name, "Stored field as additional context");
        }
        self.save(&mut profile).await?;
        Ok(profile)
    }

    /// The stored profile rendered as prompt context.
    pub async fn context_string(&self) -> Result<String, ProfileError> {
        Ok(self.load().await?.to_context_string(&self.locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::profile::InMemoryProfileStorage;
    use serde_json::json;

    fn store_with(storage: InMemoryProfileStorage) -> ProfileStore {
        ProfileStore::new(Arc::new(storage), Locale::default())
    }

    #[tokio::test]
    async fn missing_document_loads_default() {
        let store = store_with(InMemoryProfileStorage::new());
        let profile = store.load().await.unwrap();

        assert!(!profile.has_data());
        assert!(!store.profile_exists().await);
    }

    #[tokio::test]
    async fn corrupt_document_loads_default() {
        let store = store_with(InMemoryProfileStorage::with_document("{not json"));
        let profile = store.load().await.unwrap();

        assert_eq!(profile.age, None);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let storage = InMemoryProfileStorage::new();
        let store = store_with(storage.clone());

        let mut profile = UserProfile::new();
        profile.age = Some(34);
        profile.occupation = Some("Engineer".to_string());
        store.save(&mut profile).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.age, Some(34));
        assert_eq!(loaded.occupation.as_deref(), Some("Engineer"));
        assert!(storage.document().unwrap().contains("\n  \"age\": 34"));
        assert!(store.profile_exists().await);
    }

    #[tokio::test]
    async fn save_stamps_updated_at() {
        let store = store_with(InMemoryProfileStorage::new());
        let mut profile = UserProfile::new();
        let before = profile.updated_at;

        store.save(&mut profile).await.unwrap();
        assert!(profile.updated_at >= before);
    }

    #[tokio::test]
    async fn clear_removes_data() {
        let store = store_with(InMemoryProfileStorage::new());
        store.update_field("age", json!(40)).await.unwrap();
        assert!(store.profile_exists().await);

        store.clear().await.unwrap();
        assert!(!store.profile_exists().await);
    }

    #[tokio::test]
    async fn update_field_routes_unknown_names_to_context() {
        let store = store_with(InMemoryProfileStorage::new());
        store.update_field("monthly_income", json!("3500")).await.unwrap();
        let profile = store.update_field("pets", json!("two cats")).await.unwrap();

        assert_eq!(profile.monthly_income, Some(3500.0));
        assert_eq!(profile.additional_context.get("pets"), Some(&json!("two cats")));

        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded, profile);
    }

    #[tokio::test]
    async fn write_failures_propagate() {
        let store = store_with(InMemoryProfileStorage::new().failing_writes());
        let result = store.update_field("age", json!(30)).await;

        assert!(matches!(result, Err(ProfileError::Storage(StorageError::Io(_)))));
    }

    #[tokio::test]
    async fn context_string_uses_locale() {
        let store = store_with(InMemoryProfileStorage::new());
        store.update_field("age", json!(30)).await.unwrap();

        let context = store.context_string().await.unwrap();
        assert!(context.contains("Peru"));
        assert!(context.contains("30"));
    }
}
