//! Tool schema conversion port.
//!
//! Separates "which tools to expose" (domain projection) from "how to
//! serialize them for a tool-calling protocol" (infrastructure). One adapter
//! exists per protocol.

use langbridge_domain::ToolDefinition;

/// Port for converting tool definitions to a protocol's JSON shape.
pub trait ToolSchemaPort: Send + Sync {
    /// Protocol identifier (e.g. `openai`, `mcp`).
    fn protocol(&self) -> &'static str;

    /// Convert a single tool definition.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert all tools (sorted by name).
    fn all_tools_schema(&self, tools: &[ToolDefinition]) -> Vec<serde_json::Value> {
        let mut sorted: Vec<&ToolDefinition> = tools.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted.into_iter().map(|t| self.tool_to_schema(t)).collect()
    }
}
