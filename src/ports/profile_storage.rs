//! ProfileStorage port for whole-document profile persistence.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during profile storage operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("IO error: {0}")]
    Io(String),

    /// Remote object store rejected or failed the request
    #[error("Remote storage error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}

/// Raw storage for the single profile JSON document.
#[async_trait]
pub trait ProfileStorage: Send + Sync {
    /// Reads the stored document. `Ok(None)` when nothing has been saved yet.
    async fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replaces the stored document.
    async fn write(&self, content: &str) -> Result<(), StorageError>;

    /// Human-readable location, for logs and the CLI.
    fn location(&self) -> String;
}
