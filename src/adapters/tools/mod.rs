//! Tool adapters exposed to the agent loop.
//!
//! - `WebSearchTool` - web search through a `SearchProvider` (Tavily)
//! - `CalculatorTool` - sandboxed arithmetic
//! - `ProbabilityTool` - favorable/total probability
//! - `ToolSet` - registry rendering the prompt listing

mod calculator;
mod probability;
mod tavily;
mod toolset;
mod web_search;

pub use calculator::{CalculatorTool, CALCULATOR_TOOL};
pub use probability::{ProbabilityTool, PROBABILITY_TOOL};
pub use tavily::{TavilyConfig, TavilySearchProvider};
pub use toolset::ToolSet;
pub use web_search::{format_search_response, WebSearchTool, WEB_SEARCH_TOOL};

/// Extracts a text argument from raw tool input.
///
/// Models sometimes send `{"key": "value"}` instead of the bare value; both
/// forms are accepted.
pub(crate) fn text_argument(input: &str, key: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with('{') {
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(trimmed) {
            if let Some(value) = map.get(key) {
                return match value {
                    serde_json::Value::String(s) => s.trim().to_string(),
                    other => other.to_string(),
                };
            }
        }
    }
    trimmed.to_string()
}
