//! Questionnaire module - adaptive profile collection.
//!
//! Holds the answer state and the pure parts of the question/extraction
//! cycle. The model calls themselves live in the application layer.

mod answers;
mod extraction;
pub mod prompts;

pub use answers::{AnswerSet, QuestionAnswer};
pub use extraction::{clean_extraction_reply, manual_extract, parse_extraction, ExtractionError};
pub use prompts::COMPLETION_TOKEN;
