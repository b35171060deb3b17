//! Agent module - the pure parts of the ReAct decision loop.
//!
//! - `react` - parsing model turns into actions or final answers
//! - `error_policy` - failure classification, counters and corrective instructions
//! - `scratchpad` - transcript of steps and repetition detection
//! - `decision_type` - question categorization and enhancement
//! - `summarizer` - local analysis assembled from observations
//! - `prompt` - the instruction template

mod decision_type;
mod error_policy;
pub mod prompt;
mod react;
mod scratchpad;
mod summarizer;

pub use decision_type::DecisionType;
pub use error_policy::{
    ErrorCategory, ErrorPolicy, StepFailure, FORCE_FINAL_ANSWER, MAX_CONSECUTIVE_ERRORS,
    MAX_MIXED_OUTPUT_ERRORS,
};
pub use prompt::{render_agent_prompt, AgentPromptInput, FORCED_FINAL_SUFFIX};
pub use react::{parse_output, AgentAction, AgentFinish, AgentStep, OutputParseError};
pub use scratchpad::{IntermediateStep, Scratchpad, EXCEPTION_TOOL};
pub use summarizer::summarize_observations;
