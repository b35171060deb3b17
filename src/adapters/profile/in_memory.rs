//! In-memory profile storage for tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::ports::{ProfileStorage, StorageError};

/// Keeps the profile document in memory. Clones share the document.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStorage {
    document: Arc<Mutex<Option<String>>>,
    fail_writes: bool,
}

impl InMemoryProfileStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `content` already stored.
    pub fn with_document(content: impl Into<String>) -> Self {
        Self {
            document: Arc::new(Mutex::new(Some(content.into()))),
            fail_writes: false,
        }
    }

    /// Makes every write fail with an IO error.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn document(&self) -> Option<String> {
        self.document.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileStorage for InMemoryProfileStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.document.lock().unwrap().clone())
    }

    async fn write(&self, content: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io("simulated write failure".to_string()));
        }
        *self.document.lock().unwrap() = Some(content.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
