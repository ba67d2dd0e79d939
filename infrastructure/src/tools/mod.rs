//! Tool schema converters
//!
//! One [`ToolSchemaPort`](langbridge_application::ToolSchemaPort) adapter per
//! tool-calling protocol:
//! - [`FunctionCallingConverter`]: OpenAI-style function calling
//! - [`McpToolConverter`]: Model Context Protocol tools

mod mcp;
mod schema;

pub use mcp::{McpInputSchema, McpTool, McpToolConverter, PropertyOption};
pub use schema::FunctionCallingConverter;
