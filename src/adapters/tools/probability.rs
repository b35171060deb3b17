use async_trait::async_trait;
use serde_json::json;

use crate::domain::tools::OutcomeCounts;
use crate::ports::{Tool, ToolDefinition, ToolError};

pub const PROBABILITY_TOOL: &str = "probability_calculator";

/// `probability_calculator` tool: favorable over total outcomes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProbabilityTool;

#[async_trait]
impl Tool for ProbabilityTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            PROBABILITY_TOOL,
            "Computes a simple probability from favorable and total outcomes. \
             Input: the number of favorable outcomes and the total number of possible \
             outcomes, as JSON, \"a, b\" or \"a/b\".",
            json!({
                "type": "object",
                "properties": {
                    "favorable_outcomes": {
                        "type": "integer",
                        "description": "Number of favorable outcomes"
                    },
                    "total_outcomes": {
                        "type": "integer",
                        "description": "Total number of possible outcomes"
                    }
                },
                "required": ["favorable_outcomes", "total_outcomes"]
            }),
        )
    }

    async fn run(&self, input: &str) -> Result<String, ToolError> {
        let percent = OutcomeCounts::parse(input)
            .and_then(|counts| counts.percent())
            .map_err(|e| ToolError::InvalidInput(e.to_string()))?;
        Ok(format!("Probability: {:.2}%", percent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn formats_two_decimals() {
        assert_eq!(ProbabilityTool.run("1/3").await.unwrap(), "Probability: 33.33%");
        assert_eq!(
            ProbabilityTool
                .run(r#"{"favorable_outcomes": 3, "total_outcomes": 4}"#)
                .await
                .unwrap(),
            "Probability: 75.00%"
        );
    }

    #[tokio::test]
    async fn zero_total_is_an_error() {
        let err = ProbabilityTool.run("2, 0").await.unwrap_err();
        assert_eq!(err.to_string(), "Error: total outcomes must be greater than 0");
    }
}
