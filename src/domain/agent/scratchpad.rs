//! Scratchpad - the running transcript of actions and observations.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::react::AgentAction;

/// Pseudo tool name recorded for steps whose model output failed to parse.
pub const EXCEPTION_TOOL: &str = "_Exception";

/// An executed (or rejected) action and what came back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntermediateStep {
    pub action: AgentAction,
    pub observation: String,
    /// The tool did not run; `observation` holds a corrective instruction.
    #[serde(default)]
    pub rejected: bool,
}

impl IntermediateStep {
    pub fn new(action: AgentAction, observation: impl Into<String>) -> Self {
        Self {
            action,
            observation: observation.into(),
            rejected: false,
        }
    }

    /// A step whose action was refused; `instruction` is fed back instead.
    pub fn rejected(action: AgentAction, instruction: impl Into<String>) -> Self {
        Self {
            rejected: true,
            ..Self::new(action, instruction)
        }
    }

    /// True for steps that recorded a parse failure rather than a tool call.
    pub fn is_exception(&self) -> bool {
        self.action.tool == EXCEPTION_TOOL
    }

    /// True when the observation came from a tool rather than from the loop.
    pub fn has_tool_output(&self) -> bool {
        !self.rejected && !self.is_exception()
    }
}

/// Ordered steps of one run plus the set of (tool, input) pairs already executed.
#[derive(Debug, Clone, Default)]
pub struct Scratchpad {
    steps: Vec<IntermediateStep>,
    executed: HashSet<(String, String)>,
}

impl Scratchpad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[IntermediateStep] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<IntermediateStep> {
        self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// True when this exact (tool, input) pair already ran.
    pub fn was_executed(&self, tool: &str, input: &str) -> bool {
        self.executed.contains(&execution_key(tool, input))
    }

    /// Records a step whose tool actually ran.
    pub fn record_execution(&mut self, action: AgentAction, observation: impl Into<String>) {
        self.executed
            .insert(execution_key(&action.tool, &action.tool_input));
        self.steps.push(IntermediateStep::new(action, observation));
    }

    /// Records a step that did not run a tool.
    pub fn record_rejection(&mut self, action: AgentAction, instruction: impl Into<String>) {
        self.steps.push(IntermediateStep::rejected(action, instruction));
    }

    /// Records an unparseable model turn.
    pub fn record_exception(&mut self, llm_output: &str, instruction: impl Into<String>) {
        let action = AgentAction::new(EXCEPTION_TOOL, "Invalid or incomplete response", llm_output);
        self.steps.push(IntermediateStep::new(action, instruction));
    }

    /// Renders the transcript appended to the prompt on every iteration.
    pub fn render(&self) -> String {
        let mut thoughts = String::new();
        for step in &self.steps {
            thoughts.push_str(step.action.log.trim_end());
            thoughts.push_str("\nObservation: ");
            thoughts.push_str(&step.observation);
            thoughts.push_str("\nThought: ");
        }
        thoughts
    }
}

/// Normalized key used for repetition detection.
fn execution_key(tool: &str, input: &str) -> (String, String) {
    let normalized_input = input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    (tool.trim().to_lowercase(), normalized_input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(tool: &str, input: &str) -> AgentAction {
        AgentAction::new(
            tool,
            input,
            format!("Thought: go\nAction: {}\nAction Input: {}", tool, input),
        )
    }

    #[test]
    fn repetition_ignores_case_and_whitespace() {
        let mut pad = Scratchpad::new();
        pad.record_execution(action("web_search", "Data Lead  salary"), "results");

        assert!(pad.was_executed("web_search", "data lead salary"));
        assert!(pad.was_executed("Web_Search", "  DATA LEAD SALARY "));
        assert!(!pad.was_executed("web_search", "data lead benefits"));
        assert!(!pad.was_executed("calculator", "data lead salary"));
    }

    #[test]
    fn rejected_actions_do_not_count_as_executed() {
        let mut pad = Scratchpad::new();
        pad.record_rejection(action("search", "x"), "not a valid tool");
        assert!(!pad.was_executed("search", "x"));
        assert_eq!(pad.steps().len(), 1);
        assert!(pad.steps()[0].rejected);
        assert!(!pad.steps()[0].has_tool_output());
    }

    #[test]
    fn renders_log_observation_and_next_thought() {
        let mut pad = Scratchpad::new();
        pad.record_execution(action("calculator", "2+2"), "Result: 4");

        assert_eq!(
            pad.render(),
            "Thought: go\nAction: calculator\nAction Input: 2+2\nObservation: Result: 4\nThought: "
        );
    }

    #[test]
    fn exception_steps_are_marked() {
        let mut pad = Scratchpad::new();
        pad.record_exception("garbage", "ERROR: fix format");

        let step = &pad.steps()[0];
        assert!(step.is_exception());
        assert!(!step.has_tool_output());
        assert_eq!(step.action.log, "garbage");
        assert!(pad.render().starts_with("garbage\nObservation: ERROR: fix format"));
    }
}
