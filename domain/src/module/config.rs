//! Module configuration file (`dagger.json`)
//!
//! Only the parts the resolver needs are modelled. Unknown keys are ignored so
//! newer configuration files still parse.

use serde::{Deserialize, Serialize};

/// File name of a module's configuration.
pub const CONFIG_FILE_NAME: &str = "dagger.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<DependencyConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyConfig {
    pub name: String,
    pub source: String,
    #[serde(default)]
    pub pin: Option<String>,
}

impl ModuleConfig {
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    pub fn dependency_by_name(&self, name: &str) -> Option<&DependencyConfig> {
        self.dependencies.iter().find(|d| d.name == name)
    }
}
