//! Configuration file loading for langbridge
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `LANGBRIDGE_*` environment variables (e.g. `LANGBRIDGE_ENGINE__PORT`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./langbridge.toml` or `./.langbridge.toml`
//! 4. Global: `<config dir>/langbridge/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileEngineConfig, FileResolverConfig, FileToolsConfig,
};
pub use loader::ConfigLoader;
