//! Filesystem and process adapters used during module resolution.

mod environment;
mod local;

pub use environment::ProcessEnvironment;
pub use local::{DEFAULT_BOUNDARY_MARKERS, LocalWorkspace};
