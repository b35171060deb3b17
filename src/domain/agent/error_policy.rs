//! Step failure classification and corrective instructions.
//!
//! Every failed step is turned into an instruction that is fed back to the
//! model as the observation for that step. Counters escalate repeated
//! failures to an unconditional request for a final answer.

use serde::{Deserialize, Serialize};

use super::react::OutputParseError;
use crate::domain::foundation::truncate_chars;

/// Consecutive failures of any kind before a final answer is demanded.
pub const MAX_CONSECUTIVE_ERRORS: u32 = 4;

/// Mixed-output failures before a final answer is demanded.
pub const MAX_MIXED_OUTPUT_ERRORS: u32 = 2;

/// Words that indicate the model is writing a plan instead of acting.
const PLANNING_WORDS: &[&str] = &["plan", "i will", "i'm going to", "voy a", "necesito"];

/// Kind of step failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Output carried both an action and a final answer.
    MixedOutput,
    /// Output did not follow the ReAct convention.
    Unparseable,
    /// Action named a tool that is not registered.
    InvalidTool,
    /// Action repeated an earlier (tool, input) pair.
    Repetition,
    /// The model call itself failed or timed out.
    GenerationFailure,
    /// Anything else.
    Generic,
}

impl ErrorCategory {
    /// Classifies a free-form error message.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("both a final answer and a parse-able action") {
            Self::MixedOutput
        } else if lower.contains("could not parse") {
            Self::Unparseable
        } else if lower.contains("invalid tool")
            || lower.contains("no such tool")
            || lower.contains("not a valid tool")
        {
            Self::InvalidTool
        } else if lower.contains("loop") {
            Self::Repetition
        } else if lower.contains("generation") || lower.contains("timeout") {
            Self::GenerationFailure
        } else {
            Self::Generic
        }
    }
}

/// A failed step, ready to be turned into a corrective instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// Raw model output, when the failure came from parsing it.
    pub llm_output: Option<String>,
}

impl StepFailure {
    /// Classifies an arbitrary error message by its wording.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            category: ErrorCategory::classify(&message),
            message,
            llm_output: None,
        }
    }

    pub fn parse(err: &OutputParseError) -> Self {
        let category = match err {
            OutputParseError::MixedOutput { .. } => ErrorCategory::MixedOutput,
            _ => ErrorCategory::Unparseable,
        };
        Self {
            category,
            message: err.to_string(),
            llm_output: Some(err.output().to_string()),
        }
    }

    pub fn invalid_tool(name: &str) -> Self {
        Self {
            category: ErrorCategory::InvalidTool,
            message: format!("{} is not a valid tool", name),
            llm_output: None,
        }
    }

    pub fn repetition(tool: &str, input: &str) -> Self {
        Self {
            category: ErrorCategory::Repetition,
            message: format!("loop detected: {} was already called with input '{}'", tool, input),
            llm_output: None,
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self {
            category: ErrorCategory::GenerationFailure,
            message: format!("generation failed: {}", message.into()),
            llm_output: None,
        }
    }
}

/// Failure counters for one agent run.
#[derive(Debug, Clone, Default)]
pub struct ErrorPolicy {
    tool_names: Vec<String>,
    consecutive_errors: u32,
    mixed_output_errors: u32,
    total_errors: u32,
}

impl ErrorPolicy {
    /// Creates a policy that lists `tool_names` when an invalid tool is used.
    pub fn new(tool_names: Vec<String>) -> Self {
        Self {
            tool_names,
            ..Self::default()
        }
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    pub fn total_errors(&self) -> u32 {
        self.total_errors
    }

    /// Records a successfully executed tool step.
    pub fn on_success(&mut self) {
        self.consecutive_errors = 0;
    }

    /// Records a failure and returns the instruction to feed back.
    pub fn on_failure(&mut self, failure: &StepFailure) -> String {
        self.total_errors += 1;
        self.consecutive_errors += 1;

        if self.consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
            tracing::debug!(
                consecutive = self.consecutive_errors,
                "Too many consecutive errors, demanding final answer"
            );
            self.consecutive_errors = 0;
            return FORCE_FINAL_ANSWER.to_string();
        }

        match failure.category {
            ErrorCategory::MixedOutput => {
                self.consecutive_errors = 0;
                self.mixed_output_errors += 1;
                if self.mixed_output_errors >= MAX_MIXED_OUTPUT_ERRORS {
                    FORCE_FINAL_ANSWER.to_string()
                } else {
                    MIXED_OUTPUT.to_string()
                }
            }
            ErrorCategory::Unparseable => {
                let output = failure
                    .llm_output
                    .as_deref()
                    .unwrap_or(&failure.message)
                    .to_lowercase();
                if output.contains("thought") {
                    if PLANNING_WORDS.iter().any(|w| output.contains(w)) {
                        WRITING_PLANS.to_string()
                    } else {
                        THOUGHT_FORMAT.to_string()
                    }
                } else {
                    GENERIC_FORMAT.to_string()
                }
            }
            ErrorCategory::InvalidTool => self.invalid_tool_instruction(),
            ErrorCategory::Repetition => LOOP_DETECTED.to_string(),
            ErrorCategory::GenerationFailure => GENERATION_FAILURE.to_string(),
            ErrorCategory::Generic => format!(
                "ERROR: {}\n\n{}",
                truncate_chars(&failure.message, 150),
                GENERIC_SUFFIX
            ),
        }
    }

    fn invalid_tool_instruction(&self) -> String {
        let listing = self
            .tool_names
            .iter()
            .map(|name| format!("- {}", name))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "ERROR: That tool does not exist.\n\nAVAILABLE TOOLS:\n{}\n\n\
             Correct example:\n\
             Thought: I need to look up master's degree costs\n\
             Action: web_search\n\
             Action Input: AI master's degree cost universities",
            listing
        )
    }
}

/// Instruction demanding a final answer with no further actions.
pub const FORCE_FINAL_ANSWER: &str = "You have made several format errors.

FINISH NOW with a Final Answer:

Thought: Based on the information available
Final Answer: [Give an analysis of at least 3 paragraphs covering:
1. Context of the decision and relevant factors
2. Identified risks, with specific data if you have it
3. Opportunities and potential benefits
4. A recommendation based on the analysis]

Do NOT use Action or Action Input. Only Final Answer.";

const MIXED_OUTPUT: &str = "ERROR: You mixed an action with a final answer.

CORRECT if you need more information:
Thought: I need to research X
Action: web_search
Action Input: [specific search]

CORRECT if you already have enough:
Thought: I have the information I need
Final Answer: [complete analysis of 3-4 paragraphs]

Choose only ONE.";

const WRITING_PLANS: &str = "ERROR: You are writing plans instead of executing actions.

Do NOT do this:
Thought: My plan is:
1. Search X
2. Calculate Y

DO this:
Thought: I need to look up salary information
Action: web_search
Action Input: AI master's degree salary 2024

Execute ONE action NOW, do not write plans.";

const THOUGHT_FORMAT: &str = "ERROR: Incorrect Thought format.

Write EXACTLY like this (no quotes):

Thought: I need to look up information about X
Action: web_search
Action Input: [your search]

Each element on its own line. Do NOT use special symbols.";

const GENERIC_FORMAT: &str = "ERROR: I cannot understand your format.

USE THIS EXACT FORMAT:

To search:
Thought: I need to search for [what]
Action: web_search
Action Input: [search]

To calculate:
Thought: I need to calculate [what]
Action: calculator
Action Input: [math expression]

To finish:
Thought: I have the information
Final Answer: [analysis of 3-4 paragraphs]

No quotes, no special characters.";

const LOOP_DETECTED: &str = "LOOP DETECTED: You are repeating the same action.

Options:
1. Change your search (use different terms)
2. Use a different tool (calculator if you need calculations)
3. If you already have enough information, finish:

Thought: With the current information I can give the analysis
Final Answer: [Your analysis with the data you already have]";

const GENERATION_FAILURE: &str = "ERROR: Problem generating a response.

Try a simpler action:

Thought: I look up basic information
Action: web_search
Action Input: [short, specific query]

Or finish with what you have:

Thought: I provide the analysis with current information
Final Answer: [your analysis]";

const GENERIC_SUFFIX: &str = "CORRECT FORMAT:

For actions:
Thought: [what you need]
Action: [tool]
Action Input: [input]

To finish:
Thought: [conclusion]
Final Answer: [complete analysis]

Follow the format EXACTLY.";

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ErrorPolicy {
        ErrorPolicy::new(vec![
            "web_search".to_string(),
            "calculator".to_string(),
            "probability_calculator".to_string(),
        ])
    }

    mod classification {
        use super::*;

        #[test]
        fn classifies_by_message_wording() {
            assert_eq!(
                ErrorCategory::classify(
                    "Parsing LLM output produced both a final answer and a parse-able action"
                ),
                ErrorCategory::MixedOutput
            );
            assert_eq!(
                ErrorCategory::classify("Could not parse LLM output: `hello`"),
                ErrorCategory::Unparseable
            );
            assert_eq!(
                ErrorCategory::classify("search_web is not a valid tool"),
                ErrorCategory::InvalidTool
            );
            assert_eq!(
                ErrorCategory::classify("No such tool: foo"),
                ErrorCategory::InvalidTool
            );
            assert_eq!(
                ErrorCategory::classify("Loop detected"),
                ErrorCategory::Repetition
            );
            assert_eq!(
                ErrorCategory::classify("request TIMEOUT after 30s"),
                ErrorCategory::GenerationFailure
            );
            assert_eq!(
                ErrorCategory::classify("something odd"),
                ErrorCategory::Generic
            );
        }

        #[test]
        fn typed_failures_keep_their_category() {
            assert_eq!(
                StepFailure::invalid_tool("search").category,
                ErrorCategory::InvalidTool
            );
            assert_eq!(
                StepFailure::repetition("web_search", "q").category,
                ErrorCategory::Repetition
            );
            assert_eq!(
                StepFailure::generation("provider unavailable").category,
                ErrorCategory::GenerationFailure
            );

            let mixed = OutputParseError::MixedOutput {
                output: "x".to_string(),
            };
            assert_eq!(StepFailure::parse(&mixed).category, ErrorCategory::MixedOutput);
        }

        #[test]
        fn typed_messages_reclassify_to_same_category() {
            for failure in [
                StepFailure::invalid_tool("search"),
                StepFailure::repetition("web_search", "q"),
                StepFailure::generation("oops"),
            ] {
                assert_eq!(ErrorCategory::classify(&failure.message), failure.category);
            }
        }
    }

    mod instructions {
        use super::*;

        fn unparseable(output: &str) -> StepFailure {
            StepFailure::parse(&OutputParseError::MissingAction {
                output: output.to_string(),
            })
        }

        #[test]
        fn plan_writing_gets_stop_planning_text() {
            let text = policy().on_failure(&unparseable("Thought: My plan is:\n1. search"));
            assert_eq!(text, WRITING_PLANS);
        }

        #[test]
        fn thought_without_plan_gets_format_text() {
            let text = policy().on_failure(&unparseable("Thought: salaries are high"));
            assert_eq!(text, THOUGHT_FORMAT);
        }

        #[test]
        fn output_without_thought_gets_generic_format() {
            let text = policy().on_failure(&unparseable("Hello there"));
            assert_eq!(text, GENERIC_FORMAT);
        }

        #[test]
        fn invalid_tool_lists_registered_tools() {
            let text = policy().on_failure(&StepFailure::invalid_tool("search"));
            assert!(text.contains("- web_search"));
            assert!(text.contains("- probability_calculator"));
        }

        #[test]
        fn generic_error_quotes_first_150_chars() {
            let long = "x".repeat(300);
            let text = policy().on_failure(&StepFailure::from_message(long));
            assert!(text.starts_with(&format!("ERROR: {}\n", "x".repeat(150))));
            assert!(!text.contains(&"x".repeat(151)));
        }
    }

    mod counters {
        use super::*;

        #[test]
        fn fourth_consecutive_failure_forces_final_answer() {
            let mut policy = policy();
            let failure = StepFailure::repetition("web_search", "q");

            for _ in 0..3 {
                assert_eq!(policy.on_failure(&failure), LOOP_DETECTED);
            }
            assert_eq!(policy.on_failure(&failure), FORCE_FINAL_ANSWER);
            assert_eq!(policy.consecutive_errors(), 0);
            assert_eq!(policy.total_errors(), 4);
        }

        #[test]
        fn success_resets_consecutive_counter() {
            let mut policy = policy();
            let failure = StepFailure::generation("timeout");

            for _ in 0..3 {
                policy.on_failure(&failure);
            }
            policy.on_success();
            assert_eq!(policy.on_failure(&failure), GENERATION_FAILURE);
        }

        #[test]
        fn second_mixed_output_forces_final_answer() {
            let mut policy = policy();
            let mixed = StepFailure::parse(&OutputParseError::MixedOutput {
                output: "Action: a\nAction Input: b\nFinal Answer: c".to_string(),
            });

            assert_eq!(policy.on_failure(&mixed), MIXED_OUTPUT);
            assert_eq!(policy.on_failure(&mixed), FORCE_FINAL_ANSWER);
        }

        #[test]
        fn mixed_output_resets_consecutive_counter() {
            let mut policy = policy();
            let other = StepFailure::from_message("odd");
            let mixed = StepFailure::parse(&OutputParseError::MixedOutput {
                output: String::new(),
            });

            policy.on_failure(&other);
            policy.on_failure(&other);
            policy.on_failure(&mixed);
            assert_eq!(policy.consecutive_errors(), 0);
        }
    }
}
