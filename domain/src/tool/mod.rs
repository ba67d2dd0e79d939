//! Tool domain module
//!
//! A tool is a module function seen from a language model: a name, a
//! description and a flat set of JSON parameters.
//!
//! ```text
//! ┌──────────────────┐  project   ┌──────────────────┐  call   ┌──────────────┐
//! │ ModuleDefinition │──────────▶│ ToolDefinition   │◀────────│ ToolCall     │
//! │ (main object)    │           │ github_issue-list│         │ (model args) │
//! └──────────────────┘           └──────────────────┘         └──────────────┘
//! ```
//!
//! Tool names are `<module>_<function>` with the function in kebab case.
//! Descriptions are the module description followed by the function's
//! one-line summary. Only string, integer and boolean arguments, and flat
//! lists of them, become parameters (see [`projection`]).

pub mod entities;
pub mod projection;

pub use entities::{
    ParamType, PrimitiveType, ToolCall, ToolCallError, ToolDefinition, ToolParameter,
};
pub use projection::{
    ProjectedTool, Projection, ProjectionError, SkippedFunction, TOOL_NAME_SEPARATOR,
    is_denylisted, project_function, project_functions, tool_description, tool_name,
};
