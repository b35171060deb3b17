//! Local filesystem storage for the profile document

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ports::{ProfileStorage, StorageError};

/// Stores the profile as a single JSON file.
pub struct LocalProfileStorage {
    path: PathBuf,
}

impl LocalProfileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_exists(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::Io(format!("Failed to create directory {}: {}", parent.display(), e))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileStorage for LocalProfileStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, content: &str) -> Result<(), StorageError> {
        self.ensure_parent_exists().await?;

        // Write to a sibling temp file, then rename into place
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content)
            .await
            .map_err(|e| StorageError::Io(format!("Failed to write temporary file: {}", e)))?;

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StorageError::Io(format!("Failed to rename file: {}", e)))?;

        tracing::debug!(path = %self.path.display(), bytes = content.len(), "Profile written");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
