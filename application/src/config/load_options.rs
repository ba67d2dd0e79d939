//! Module loading options.
//!
//! [`LoadOptions`] groups the switches that control how a module reference
//! is resolved and how its tools are prepared.

use serde::{Deserialize, Serialize};

/// Options for resolving and loading a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Walk upward from local references to the nearest configuration file.
    pub find_up: bool,
    /// Resolve local sources relative to the calling client.
    pub resolve_from_caller: bool,
    /// Bind constructor arguments from `<MODULE>_<ARG>` environment variables.
    pub hydrate_from_env: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            find_up: true,
            resolve_from_caller: true,
            hydrate_from_env: true,
        }
    }
}

impl LoadOptions {
    // ==================== Builder Methods ====================

    pub fn with_find_up(mut self, enabled: bool) -> Self {
        self.find_up = enabled;
        self
    }

    pub fn with_resolve_from_caller(mut self, enabled: bool) -> Self {
        self.resolve_from_caller = enabled;
        self
    }

    pub fn with_hydrate_from_env(mut self, enabled: bool) -> Self {
        self.hydrate_from_env = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LoadOptions::default();
        assert!(options.find_up);
        assert!(options.resolve_from_caller);
        assert!(options.hydrate_from_env);
    }

    #[test]
    fn test_builder() {
        let options = LoadOptions::default()
            .with_find_up(false)
            .with_hydrate_from_env(false);
        assert!(!options.find_up);
        assert!(options.resolve_from_caller);
        assert!(!options.hydrate_from_env);
    }
}
