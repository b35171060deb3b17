//! ReAct output parsing.
//!
//! The model is steered to answer with either
//!
//! ```text
//! Thought: ...
//! Action: <tool name>
//! Action Input: <input>
//! ```
//!
//! or
//!
//! ```text
//! Thought: ...
//! Final Answer: <analysis>
//! ```
//!
//! Anything else is a parse error that the loop reports back to the model.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static ACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*Action:[ \t]*(.*)$").expect("valid action regex"));

static ACTION_INPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ms)^[ \t]*Action Input:[ \t]*(.*?)(?:\n[ \t]*Observation:|\n[ \t]*Thought:|\n[ \t]*Final Answer:|\z)",
    )
    .expect("valid action input regex")
});

static FINAL_ANSWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Final Answer:\s*(.*)").expect("valid final answer regex"));

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentAction {
    /// Tool name as written by the model.
    pub tool: String,
    /// Tool input, trimmed and unquoted.
    pub tool_input: String,
    /// The raw model output that produced this action.
    pub log: String,
}

impl AgentAction {
    pub fn new(
        tool: impl Into<String>,
        tool_input: impl Into<String>,
        log: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            tool_input: tool_input.into(),
            log: log.into(),
        }
    }
}

/// The model's final answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentFinish {
    pub output: String,
    pub log: String,
}

/// One parsed model turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentStep {
    Action(AgentAction),
    Finish(AgentFinish),
}

/// Model output that does not follow the ReAct convention.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OutputParseError {
    #[error("Parsing LLM output produced both a final answer and a parse-able action: {output}")]
    MixedOutput { output: String },

    #[error("Could not parse LLM output, missing 'Action Input:' after 'Action:': `{output}`")]
    MissingActionInput { output: String },

    #[error("Could not parse LLM output, missing 'Action:' after 'Thought:': `{output}`")]
    MissingAction { output: String },

    #[error("Could not parse LLM output: `{output}`")]
    Unparseable { output: String },
}

impl OutputParseError {
    /// The offending model output.
    pub fn output(&self) -> &str {
        match self {
            Self::MixedOutput { output }
            | Self::MissingActionInput { output }
            | Self::MissingAction { output }
            | Self::Unparseable { output } => output,
        }
    }
}

/// Parses one model turn.
pub fn parse_output(text: &str) -> Result<AgentStep, OutputParseError> {
    let action = ACTION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| clean_tool_name(m.as_str()));
    let action_input = ACTION_INPUT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| clean_tool_input(m.as_str()));
    let final_answer = FINAL_ANSWER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string());

    if let (Some(tool), Some(tool_input)) = (&action, &action_input) {
        if !tool.is_empty() {
            if final_answer.is_some() {
                return Err(OutputParseError::MixedOutput {
                    output: text.to_string(),
                });
            }
            return Ok(AgentStep::Action(AgentAction::new(
                tool.clone(),
                tool_input.clone(),
                text,
            )));
        }
    }

    if let Some(output) = final_answer {
        return Ok(AgentStep::Finish(AgentFinish {
            output,
            log: text.to_string(),
        }));
    }

    let output = text.to_string();
    if text.trim().is_empty() {
        Err(OutputParseError::Unparseable { output })
    } else if action.is_some() {
        Err(OutputParseError::MissingActionInput { output })
    } else {
        Err(OutputParseError::MissingAction { output })
    }
}

fn clean_tool_name(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '`' || c == '*' || c == '"' || c == '\'')
        .trim()
        .to_string()
}

fn clean_tool_input(raw: &str) -> String {
    raw.trim().trim_matches('"').trim().to_string()
}
