//! Tool Port - callables the agent may invoke by name.
//!
//! A tool receives the raw `Action Input:` text and returns the observation
//! fed back to the model. Failures are reported as [`ToolError`], whose
//! display text is itself used as the observation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name, description and input schema of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    name: String,
    description: String,
    /// JSON Schema for the input
    parameters_schema: serde_json::Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters_schema(&self) -> &serde_json::Value {
        &self.parameters_schema
    }

    /// Names of the schema's properties.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters_schema
            .get("properties")
            .and_then(|p| p.as_object())
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// One line for the agent prompt's tool listing.
    pub fn prompt_line(&self) -> String {
        format!(
            "{}({}) - {}",
            self.name,
            self.parameter_names().join(", "),
            self.description
        )
    }
}

/// Tool execution errors. The display text is shown to the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Web search error: {0}")]
    Search(String),

    #[error("Calculation error: {0}")]
    Calculation(String),

    #[error("Error: {0}")]
    InvalidInput(String),
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    async fn run(&self, input: &str) -> Result<String, ToolError>;
}
