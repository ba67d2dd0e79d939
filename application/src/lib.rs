//! Application layer for langbridge
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::LoadOptions;
pub use ports::{
    environment::EnvironmentPort,
    tool_schema::ToolSchemaPort,
    transport::{GraphQlRequest, QueryTransport, TransportError},
    workspace::{WorkspaceError, WorkspacePort},
};
pub use use_cases::dispatch_tool::{DispatchError, DispatchToolUseCase};
pub use use_cases::hydrate_constructor::{
    BoundArguments, BoundValue, HydrateConstructorUseCase, HydrationError, SecretHandle,
};
pub use use_cases::load_module::{LoadModuleUseCase, SchemaError};
pub use use_cases::load_tools::{
    LoadToolsError, LoadToolsInput, LoadToolsUseCase, SkippedTool, Tool, ToolSet,
};
pub use use_cases::resolve_module::{ResolutionError, ResolveModuleUseCase};
