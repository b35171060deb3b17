//! Registry of the tools offered to the agent.

use std::sync::Arc;

use crate::ports::{Tool, ToolDefinition};

/// Tools by name, in registration order.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<(String, Arc<dyn Tool>)>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name().to_string();
        if let Some(slot) = self.tools.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = tool;
        } else {
            self.tools.push((name, tool));
        }
    }

    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, tool)| Arc::clone(tool))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|(n, _)| n == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|(_, t)| t.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// One line per tool, for the prompt's tool listing.
    pub fn render_listing(&self) -> String {
        self.definitions()
            .iter()
            .map(ToolDefinition::prompt_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Comma-separated tool names.
    pub fn render_names(&self) -> String {
        self.names().join(", ")
    }
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSet").field("tools", &self.names()).finish()
    }
}
