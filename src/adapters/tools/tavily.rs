//! Tavily search API client.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

use crate::ports::{SearchError, SearchProvider, SearchResponse};

/// Configuration for the Tavily search provider.
#[derive(Debug, Clone)]
pub struct TavilyConfig {
    api_key: Secret<String>,
    pub base_url: String,
    /// "basic" or "advanced"
    pub search_depth: String,
    pub max_results: u32,
    pub include_answer: bool,
    pub timeout: Duration,
}

impl TavilyConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.tavily.com".to_string(),
            search_depth: "advanced".to_string(),
            max_results: 5,
            include_answer: true,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_search_depth(mut self, depth: impl Into<String>) -> Self {
        self.search_depth = depth.into();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct TavilySearchProvider {
    config: TavilyConfig,
    client: Client,
}

impl TavilySearchProvider {
    pub fn new(config: TavilyConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SearchError::Network(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.config.base_url.trim_end_matches('/'))
    }

    fn request_body<'a>(&'a self, query: &'a str) -> TavilyRequest<'a> {
        TavilyRequest {
            query,
            search_depth: &self.config.search_depth,
            max_results: self.config.max_results,
            include_answer: self.config.include_answer,
        }
    }
}

#[async_trait]
impl SearchProvider for TavilySearchProvider {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let api_key = self.config.api_key.expose_secret();
        if api_key.is_empty() {
            return Err(SearchError::MissingApiKey);
        }

        tracing::debug!(query, depth = %self.config.search_depth, "Tavily search");

        let response = self
            .client
            .post(self.search_url())
            .bearer_auth(api_key)
            .json(&self.request_body(query))
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    max_results: u32,
    include_answer: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_configured_search_options() {
        let provider = TavilySearchProvider::new(TavilyConfig::new("key")).unwrap();
        let body = serde_json::to_value(provider.request_body("salaries in Lima")).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "query": "salaries in Lima",
                "search_depth": "advanced",
                "max_results": 5,
                "include_answer": true
            })
        );
    }

    #[test]
    fn search_url_joins_base() {
        let provider =
            TavilySearchProvider::new(TavilyConfig::new("key").with_base_url("http://localhost:9/"))
                .unwrap();
        assert_eq!(provider.search_url(), "http://localhost:9/search");
    }

    #[tokio::test]
    async fn missing_key_fails_without_request() {
        let provider = TavilySearchProvider::new(TavilyConfig::new("")).unwrap();
        assert_eq!(
            provider.search("anything").await,
            Err(SearchError::MissingApiKey)
        );
    }

    #[test]
    fn tavily_response_shape_deserializes() {
        let parsed: SearchResponse = serde_json::from_value(serde_json::json!({
            "query": "q",
            "answer": "Average salary is 5000 PEN",
            "results": [
                {"title": "Salaries", "url": "https://example.com", "content": "text", "score": 0.9}
            ],
            "response_time": 1.2
        }))
        .unwrap();

        assert_eq!(parsed.answer.as_deref(), Some("Average salary is 5000 PEN"));
        assert_eq!(parsed.results[0].url.as_deref(), Some("https://example.com"));
    }
}
