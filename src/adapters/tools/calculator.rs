use async_trait::async_trait;
use serde_json::json;

use super::text_argument;
use crate::domain::tools::{evaluate, format_number};
use crate::ports::{Tool, ToolDefinition, ToolError};

pub const CALCULATOR_TOOL: &str = "calculator";

/// `calculator` tool over the sandboxed expression evaluator.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            CALCULATOR_TOOL,
            "Evaluates mathematical expressions. Supports + - * / % and ** or ^ for powers, \
             parentheses, pi and e, and the functions abs, round, min, max, sum, pow, sqrt, \
             sin, cos, tan, log and exp. Input: a valid mathematical expression.",
            json!({
                "type": "object",
                "properties": {
                    "expression": {
                        "type": "string",
                        "description": "Mathematical expression to evaluate"
                    }
                },
                "required": ["expression"]
            }),
        )
    }

    async fn run(&self, input: &str) -> Result<String, ToolError> {
        let expression = text_argument(input, "expression");
        let value = evaluate(&expression).map_err(|e| ToolError::Calculation(e.to_string()))?;
        Ok(format!("Result: {}", format_number(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn evaluates_plain_and_json_input() {
        assert_eq!(CalculatorTool.run("5000 * 12").await.unwrap(), "Result: 60000");
        assert_eq!(
            CalculatorTool.run(r#"{"expression": "10 / 4"}"#).await.unwrap(),
            "Result: 2.5"
        );
    }

    #[tokio::test]
    async fn reports_calculation_errors() {
        let err = CalculatorTool.run("1 / 0").await.unwrap_err();
        assert_eq!(err.to_string(), "Calculation error: division by zero");
    }
}
