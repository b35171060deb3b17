//! AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound accepted for `max_retries`.
pub const MAX_RETRIES: u32 = 10;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Provider used for every model call
    pub provider: AiProvider,

    pub openai_api_key: Option<Secret<String>>,
    pub anthropic_api_key: Option<Secret<String>>,

    pub openai_model: String,
    pub anthropic_model: String,

    /// Sampling temperature for agent steps
    pub agent_temperature: f32,

    /// Sampling temperature for decision tree generation
    pub tree_temperature: f32,

    /// Sampling temperature for questionnaire questions
    pub questionnaire_temperature: f32,

    /// Maximum output tokens per call
    pub max_tokens: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum retries on transient failures
    pub max_retries: u32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAI,
    Anthropic,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.provider {
            AiProvider::OpenAI if !self.has_openai() => {
                return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
            }
            AiProvider::Anthropic if !self.has_anthropic() => {
                return Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"));
            }
            _ => {}
        }

        for (field, value) in [
            ("agent_temperature", self.agent_temperature),
            ("tree_temperature", self.tree_temperature),
            ("questionnaire_temperature", self.questionnaire_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(ValidationError::InvalidTemperature { field, value });
            }
        }

        if self.max_tokens == 0 {
            return Err(ValidationError::MustBePositive { field: "max_tokens" });
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_retries > MAX_RETRIES {
            return Err(ValidationError::TooLarge {
                field: "max_retries",
                max: u64::from(MAX_RETRIES),
                value: u64::from(self.max_retries),
            });
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            openai_api_key: None,
            anthropic_api_key: None,
            openai_model: "gpt-4o".to_string(),
            anthropic_model: "claude-sonnet-4-20250514".to_string(),
            agent_temperature: 0.1,
            tree_temperature: 0.2,
            questionnaire_temperature: 0.3,
            max_tokens: 8192,
            timeout_secs: 120,
            max_retries: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> Option<Secret<String>> {
        Some(Secret::new(value.to_string()))
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.provider, AiProvider::OpenAI);
        assert_eq!(config.agent_temperature, 0.1);
        assert_eq!(config.tree_temperature, 0.2);
        assert_eq!(config.questionnaire_temperature, 0.3);
        assert_eq!(config.max_tokens, 8192);
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_has_provider_checks() {
        let config = AiConfig {
            openai_api_key: secret("sk-xxx"),
            anthropic_api_key: secret(""),
            ..Default::default()
        };
        assert!(config.has_openai());
        assert!(!config.has_anthropic());
    }

    #[test]
    fn test_validation_missing_key() {
        let config = AiConfig::default();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("OPENAI_API_KEY"))
        );
    }

    #[test]
    fn test_validation_selected_provider_needs_key() {
        let config = AiConfig {
            provider: AiProvider::Anthropic,
            openai_api_key: secret("sk-xxx"),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))
        );
    }

    #[test]
    fn test_validation_temperature_range() {
        let config = AiConfig {
            openai_api_key: secret("sk-xxx"),
            tree_temperature: 3.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTemperature {
                field: "tree_temperature",
                ..
            })
        ));
    }

    #[test]
    fn test_validation_bounds_retries() {
        let config = AiConfig {
            openai_api_key: secret("sk-xxx"),
            max_retries: 64,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::TooLarge {
                field: "max_retries",
                max: 10,
                value: 64,
            })
        );

        let config = AiConfig {
            openai_api_key: secret("sk-xxx"),
            max_retries: MAX_RETRIES,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_valid_config() {
        let config = AiConfig {
            provider: AiProvider::Anthropic,
            anthropic_api_key: secret("sk-ant-xxx"),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = AiConfig {
            openai_api_key: secret("sk-very-secret"),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("sk-very-secret"));
    }
}
