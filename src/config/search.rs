//! Web search (Tavily) configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Tavily search configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Tavily API key; web search is disabled without one
    pub tavily_api_key: Option<Secret<String>>,

    pub base_url: String,

    /// `basic` or `advanced`
    pub search_depth: String,

    pub max_results: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The API key, when one is set and non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.tavily_api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .filter(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !matches!(self.search_depth.as_str(), "basic" | "advanced") {
            return Err(ValidationError::InvalidSearchDepth(self.search_depth.clone()));
        }
        if self.max_results == 0 {
            return Err(ValidationError::MustBePositive {
                field: "search.max_results",
            });
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl {
                field: "search.base_url",
                value: self.base_url.clone(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tavily_api_key: None,
            base_url: "https://api.tavily.com".to_string(),
            search_depth: "advanced".to_string(),
            max_results: 5,
            timeout_secs: 30,
        }
    }
}
