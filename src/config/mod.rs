//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `DECISION_AGENT_` prefix and nested values use double underscores as separators.
//! Every section has defaults, so only API keys normally need to be set.
//!
//! # Example
//!
//! ```no_run
//! use decision_agent::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Profile stored at {}", config.storage.local_path.display());
//! ```

mod agent;
mod ai;
mod error;
mod search;
mod storage;

pub use agent::AgentConfig;
pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ValidationError};
pub use search::SearchConfig;
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

use crate::domain::foundation::Locale;

/// Questionnaire configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuestionnaireConfig {
    /// Questions asked before the questionnaire ends on its own
    pub max_questions: usize,
}

impl Default for QuestionnaireConfig {
    fn default() -> Self {
        Self { max_questions: 15 }
    }
}

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// AI provider configuration (OpenAI/Anthropic)
    pub ai: AiConfig,

    /// Web search configuration (Tavily)
    pub search: SearchConfig,

    /// Agent loop budgets and analysis thresholds
    pub agent: AgentConfig,

    pub questionnaire: QuestionnaireConfig,

    /// Profile storage (local file or GCS)
    pub storage: StorageConfig,

    /// Country and currency the analyses are grounded in
    pub locale: Locale,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DECISION_AGENT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `DECISION_AGENT__AI__OPENAI_API_KEY=sk-...` -> `ai.openai_api_key = sk-...`
    /// - `DECISION_AGENT__AGENT__MAX_ITERATIONS=8` -> `agent.max_iterations = 8`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DECISION_AGENT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.search.validate()?;
        self.agent.validate()?;
        self.storage.validate()?;
        if self.questionnaire.max_questions == 0 {
            return Err(ValidationError::MustBePositive {
                field: "questionnaire.max_questions",
            });
        }
        Ok(())
    }
}
