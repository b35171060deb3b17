//! Profile storage configuration

use secrecy::Secret;
use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where the profile document lives
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// File path for the local backend
    pub local_path: PathBuf,

    /// Bucket for the GCS backend
    pub bucket: Option<String>,

    /// Object name for the GCS backend
    pub object: String,

    /// OAuth bearer token for the GCS backend
    pub access_token: Option<Secret<String>>,

    /// Storage API root, overridable for emulators
    pub gcs_base_url: Option<String>,
}

/// Storage backend type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Local,
    Gcs,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.backend {
            StorageBackend::Local if self.local_path.as_os_str().is_empty() => {
                Err(ValidationError::MissingRequired("STORAGE__LOCAL_PATH"))
            }
            StorageBackend::Gcs if self.bucket.as_deref().unwrap_or("").is_empty() => {
                Err(ValidationError::MissingRequired("STORAGE__BUCKET"))
            }
            StorageBackend::Gcs if self.object.is_empty() => {
                Err(ValidationError::MissingRequired("STORAGE__OBJECT"))
            }
            _ => Ok(()),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            local_path: PathBuf::from("data/user_profile.json"),
            bucket: None,
            object: "user_profile.json".to_string(),
            access_token: None,
            gcs_base_url: None,
        }
    }
}
