//! Tools configuration (`[tools]` section)
//!
//! ```toml
//! [tools]
//! modules = ["github", "./ci"]
//! hydrate_from_env = true
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Module references loaded when none are given on the command line
    pub modules: Vec<String>,
    /// Bind constructor arguments from `<MODULE>_<ARG>` variables
    pub hydrate_from_env: bool,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            modules: Vec::new(),
            hydrate_from_env: true,
        }
    }
}
