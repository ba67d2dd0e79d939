//! Infrastructure layer for langbridge
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod engine;
pub mod tools;
pub mod workspace;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileEngineConfig, FileResolverConfig,
    FileToolsConfig,
};
pub use engine::{EngineClient, EngineError, EngineSettings};
pub use tools::{FunctionCallingConverter, McpTool, McpToolConverter, PropertyOption};
pub use workspace::{LocalWorkspace, ProcessEnvironment};
