//! Modules
//!
//! Loaded module definitions, their sources and configuration files.

pub mod config;
pub mod definition;
pub mod source;

pub use config::{CONFIG_FILE_NAME, DependencyConfig, ModuleConfig};
pub use definition::{ModuleDefinition, ModuleDependency, ModuleError, ModuleMetadata};
pub use source::{ConfiguredModule, ModuleSourceRef, SourceKind};
