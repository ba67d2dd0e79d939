//! Module resolution configuration (`[resolver]` section)

use langbridge_domain::CONFIG_FILE_NAME;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResolverConfig {
    /// Name of the module configuration file
    pub config_file: String,
    /// Entries marking a repository root; the upward search stops there
    pub boundary_markers: Vec<String>,
    /// Walk upward from local references to the nearest configuration
    pub find_up: bool,
    /// Resolve local sources relative to the caller's filesystem
    pub resolve_from_caller: bool,
}

impl Default for FileResolverConfig {
    fn default() -> Self {
        Self {
            config_file: CONFIG_FILE_NAME.to_string(),
            boundary_markers: vec![".git".to_string()],
            find_up: true,
            resolve_from_caller: true,
        }
    }
}
