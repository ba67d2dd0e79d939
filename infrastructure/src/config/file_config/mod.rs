//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! where needed.

mod engine;
mod resolver;
mod tools;

pub use engine::FileEngineConfig;
pub use resolver::FileResolverConfig;
pub use tools::FileToolsConfig;

use langbridge_application::LoadOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("resolver.config_file cannot be empty")]
    EmptyConfigFileName,

    #[error("resolver.boundary_markers cannot contain an empty entry")]
    EmptyBoundaryMarker,

    #[error("tools.modules cannot contain an empty reference")]
    EmptyModuleReference,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Engine connection
    pub engine: FileEngineConfig,
    /// Module resolution
    pub resolver: FileResolverConfig,
    /// Tool loading
    pub tools: FileToolsConfig,
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.resolver.config_file.trim().is_empty() {
            return Err(ConfigValidationError::EmptyConfigFileName);
        }
        if self
            .resolver
            .boundary_markers
            .iter()
            .any(|m| m.trim().is_empty())
        {
            return Err(ConfigValidationError::EmptyBoundaryMarker);
        }
        if self.tools.modules.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyModuleReference);
        }
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::default()
            .with_find_up(self.resolver.find_up)
            .with_resolve_from_caller(self.resolver.resolve_from_caller)
            .with_hydrate_from_env(self.tools.hydrate_from_env)
    }
}
