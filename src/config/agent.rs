//! Agent loop and analysis configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Budgets and thresholds for decision analysis
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model turns per run before forcing an answer
    pub max_iterations: u32,

    /// Wall-clock budget per run in seconds
    pub max_execution_secs: u64,

    /// Analysis attempts per question
    pub max_attempts: u32,

    /// Pause between attempts in seconds
    pub retry_pause_secs: u64,

    /// Answers shorter than this are rebuilt from observations
    pub min_answer_chars: usize,

    /// Analyses shorter than this fail the attempt
    pub min_analysis_chars: usize,

    pub max_tree_depth: u32,
}

impl AgentConfig {
    pub fn max_execution_time(&self) -> Duration {
        Duration::from_secs(self.max_execution_secs)
    }

    pub fn retry_pause(&self) -> Duration {
        Duration::from_secs(self.retry_pause_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_iterations == 0 {
            return Err(ValidationError::MustBePositive {
                field: "agent.max_iterations",
            });
        }
        if self.max_execution_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_attempts == 0 {
            return Err(ValidationError::MustBePositive {
                field: "agent.max_attempts",
            });
        }
        if self.max_tree_depth == 0 {
            return Err(ValidationError::MustBePositive {
                field: "agent.max_tree_depth",
            });
        }
        if self.min_analysis_chars > self.min_answer_chars {
            return Err(ValidationError::InconsistentLengths);
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 12,
            max_execution_secs: 600,
            max_attempts: 3,
            retry_pause_secs: 2,
            min_answer_chars: 200,
            min_analysis_chars: 100,
            max_tree_depth: 4,
        }
    }
}
