//! Workspace port
//!
//! Defines the interface to the local filesystem the resolver walks.

use async_trait::async_trait;
use langbridge_domain::ModuleConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid module configuration at {}: {message}", path.display())]
    InvalidConfig { path: PathBuf, message: String },

    #[error("Operation cancelled")]
    Cancelled,
}

/// Port for filesystem access during module resolution
#[async_trait]
pub trait WorkspacePort: Send + Sync {
    /// Name of the module configuration file (e.g. `dagger.json`).
    fn config_file_name(&self) -> &str;

    fn current_dir(&self) -> Result<PathBuf, WorkspaceError>;

    /// Absolute, lexically cleaned form of `path`.
    fn absolute(&self, path: &Path) -> Result<PathBuf, WorkspaceError>;

    /// Nearest directory at or above `start` holding a configuration file.
    ///
    /// The walk stops after a directory carrying a repository boundary marker
    /// or at the filesystem root, returning `None`.
    async fn find_config_upward(
        &self,
        start: &Path,
        cancel: &CancellationToken,
    ) -> Result<Option<PathBuf>, WorkspaceError>;

    /// Parses the configuration file in `dir`, if there is one.
    async fn read_config(&self, dir: &Path) -> Result<Option<ModuleConfig>, WorkspaceError>;

    async fn config_exists(&self, dir: &Path) -> Result<bool, WorkspaceError>;

    /// Creates `dir` and any missing parents.
    async fn ensure_dir(&self, dir: &Path) -> Result<(), WorkspaceError>;
}
