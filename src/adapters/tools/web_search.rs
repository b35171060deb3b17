//! `web_search` tool backed by a [`SearchProvider`].

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::text_argument;
use crate::domain::foundation::truncate_chars;
use crate::ports::{SearchProvider, SearchResponse, Tool, ToolDefinition, ToolError};

pub const WEB_SEARCH_TOOL: &str = "web_search";

const SOURCES_SHOWN: usize = 3;
const SNIPPET_CHARS: usize = 200;

pub struct WebSearchTool {
    provider: Arc<dyn SearchProvider>,
}

impl WebSearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }
}

/// Formats a search response as the observation shown to the model.
pub fn format_search_response(response: &SearchResponse) -> String {
    let mut parts = Vec::new();

    if let Some(answer) = response.answer.as_deref().filter(|a| !a.is_empty()) {
        parts.push(format!("SUMMARY: {}\n", answer));
    }

    parts.push("SOURCES:".to_string());
    for (i, result) in response.results.iter().take(SOURCES_SHOWN).enumerate() {
        let title = result.title.as_deref().unwrap_or("Untitled");
        let content = result.content.as_deref().unwrap_or("No content");
        let url = result.url.as_deref().unwrap_or("");

        parts.push(format!("\n{}. {}", i + 1, title));
        parts.push(format!("   {}...", truncate_chars(content, SNIPPET_CHARS)));
        parts.push(format!("   URL: {}", url));
    }

    parts.join("\n")
}

#[async_trait]
impl Tool for WebSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            WEB_SEARCH_TOOL,
            "Searches the internet for current information. Use it for current prices, \
             market salaries, company data, service costs, economic information, recent news \
             and statistics. Input: a clear natural-language query.",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Natural-language search query"
                    }
                },
                "required": ["query"]
            }),
        )
    }

    async fn run(&self, input: &str) -> Result<String, ToolError> {
        let query = text_argument(input, "query");
        if query.is_empty() {
            return Err(ToolError::Search("query is empty".to_string()));
        }

        let response = self
            .provider
            .search(&query)
            .await
            .map_err(|e| ToolError::Search(e.to_string()))?;

        tracing::debug!(query = %query, results = response.results.len(), "Web search completed");
        Ok(format_search_response(&response))
    }
}
