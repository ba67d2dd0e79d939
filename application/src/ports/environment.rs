//! Environment port
//!
//! Source of constructor argument values during hydration.

/// Port for reading environment variables
pub trait EnvironmentPort: Send + Sync {
    /// Value of `name`, or `None` when unset or not valid unicode.
    fn var(&self, name: &str) -> Option<String>;
}
