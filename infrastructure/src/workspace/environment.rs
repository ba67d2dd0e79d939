//! Process environment adapter

use langbridge_application::EnvironmentPort;

/// [`EnvironmentPort`] reading the current process's environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentPort for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_variable() {
        assert_eq!(
            ProcessEnvironment.var("LANGBRIDGE_TEST_VARIABLE_THAT_IS_NEVER_SET"),
            None
        );
    }

    #[test]
    fn test_path_is_visible() {
        assert!(ProcessEnvironment.var("PATH").is_some());
    }
}
