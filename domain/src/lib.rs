//! Domain layer for langbridge
//!
//! This crate contains the type model, tool projection and query building.
//! It has no dependencies on infrastructure or presentation concerns: nothing
//! here performs I/O.
//!
//! # Core Concepts
//!
//! ## Module
//!
//! A module is a set of objects introspected from the engine. Its **main
//! object** is the one named after the module; its functions are what a
//! language model gets to call.
//!
//! ## Tool
//!
//! Each eligible main-object function is projected into a tool definition
//! with JSON parameters. A tool call is dispatched back to the engine as a
//! nested query: select the module (with its constructor arguments), then
//! select the function (with the call's arguments).

pub mod core;
pub mod introspection;
pub mod module;
pub mod query;
pub mod tool;
pub mod typedef;

// Re-export commonly used types
pub use core::naming::{ROOT_OBJECT, cli_name, env_var_name, gql_field_name, gql_object_name};
pub use introspection::{RawModuleSource, RawTypeDef};
pub use module::{
    CONFIG_FILE_NAME, ConfiguredModule, ModuleConfig, ModuleDefinition, ModuleDependency,
    ModuleError, ModuleMetadata, ModuleSourceRef, SourceKind,
};
pub use query::{QueryBuildError, QueryBuilder};
pub use tool::{
    ParamType, PrimitiveType, ProjectedTool, Projection, ProjectionError, SkippedFunction,
    ToolCall, ToolCallError, ToolDefinition, ToolParameter, project_functions,
};
pub use typedef::{
    ArgumentDefinition, FunctionDefinition, FunctionProvider, ObjectDefinition, TypeKind,
    TypeRef, TypeRegistry, TypeShape,
};
