//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - chat completions (OpenAI, Anthropic, mock)
//! - `SearchProvider` - web search backend behind the `web_search` tool
//! - `Tool` - callables exposed to the agent loop
//! - `ProfileStorage` - whole-document persistence of the user profile

mod ai_provider;
mod profile_storage;
mod search_provider;
mod tool;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestPurpose, TokenUsage,
};
pub use profile_storage::{ProfileStorage, StorageError};
pub use search_provider::{SearchError, SearchProvider, SearchResponse, SearchResult};
pub use tool::{Tool, ToolDefinition, ToolError};
