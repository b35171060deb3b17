//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Chat completion providers (OpenAI, Anthropic, mock)
//! - `profile` - Profile document storage (local file, GCS, in-memory)
//! - `tools` - Agent tools (web search, calculator, probability) and the registry

pub mod ai;
pub mod profile;
pub mod tools;
