//! Google Cloud Storage profile storage over the JSON API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

use crate::ports::{ProfileStorage, StorageError};

/// Configuration for [`GcsProfileStorage`].
#[derive(Debug, Clone)]
pub struct GcsConfig {
    pub bucket: String,
    pub object: String,
    /// OAuth bearer token; requests are unauthenticated without one.
    access_token: Option<Secret<String>>,
    /// API root, overridable for emulators.
    pub base_url: String,
    pub timeout: Duration,
}

impl GcsConfig {
    pub fn new(bucket: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            object: object.into(),
            access_token: None,
            base_url: "https://storage.googleapis.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(Secret::new(token.into()));
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Stores the profile as one object in a bucket.
pub struct GcsProfileStorage {
    config: GcsConfig,
    client: Client,
}

impl GcsProfileStorage {
    pub fn new(config: GcsConfig) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StorageError::Io(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn base(&self) -> Result<Url, StorageError> {
        Url::parse(self.config.base_url.trim_end_matches('/'))
            .map_err(|e| StorageError::Io(format!("Invalid storage URL: {}", e)))
    }

    /// `GET {base}/storage/v1/b/{bucket}/o/{object}?alt=media`
    fn download_url(&self) -> Result<Url, StorageError> {
        let mut url = self.base()?;
        url.path_segments_mut()
            .map_err(|_| StorageError::Io("Storage URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend([
                "storage",
                "v1",
                "b",
                self.config.bucket.as_str(),
                "o",
                self.config.object.as_str(),
            ]);
        url.query_pairs_mut().append_pair("alt", "media");
        Ok(url)
    }

    /// `POST {base}/upload/storage/v1/b/{bucket}/o?uploadType=media&name={object}`
    fn upload_url(&self) -> Result<Url, StorageError> {
        let mut url = self.base()?;
        url.path_segments_mut()
            .map_err(|_| StorageError::Io("Storage URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["upload", "storage", "v1", "b", self.config.bucket.as_str(), "o"]);
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", &self.config.object);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn remote_error(response: reqwest::Response) -> StorageError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        StorageError::Remote { status, message }
    }
}

#[async_trait]
impl ProfileStorage for GcsProfileStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        let response = self
            .authorize(self.client.get(self.download_url()?))
            .send()
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
                let message = response.text().await.unwrap_or_default();
                Err(StorageError::PermissionDenied(message))
            }
            status if status.is_success() => response
                .text()
                .await
                .map(Some)
                .map_err(|e| StorageError::Io(e.to_string())),
            _ => Err(Self::remote_error(response).await),
        }
    }

    async fn write(&self, content: &str) -> Result<(), StorageError> {
        let response = self
            .authorize(self.client.post(self.upload_url()?))
            .header("Content-Type", "application/json")
            .body(content.to_string())
            .send()
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::remote_error(response).await);
        }

        tracing::debug!(
            bucket = %self.config.bucket,
            object = %self.config.object,
            "Profile uploaded"
        );
        Ok(())
    }

    fn location(&self) -> String {
        format!("gs://{}/{}", self.config.bucket, self.config.object)
    }
}
