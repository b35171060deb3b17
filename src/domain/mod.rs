//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (timestamps, locale, text helpers, errors)
//! - `profile` - User profile record and lenient field coercion
//! - `questionnaire` - Answer collection, extraction parsing and prompts
//! - `agent` - ReAct output parsing, error policy, scratchpad and summaries
//! - `tree` - Probability tree building, layout and rendering
//! - `tools` - Pure evaluation behind the calculator and probability tools

pub mod agent;
pub mod foundation;
pub mod profile;
pub mod questionnaire;
pub mod tools;
pub mod tree;
