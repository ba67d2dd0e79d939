//! Local filesystem workspace
//!
//! Implements [`WorkspacePort`] over `tokio::fs`. The upward configuration
//! search is an explicit loop over ancestors:
//!
//! 1. `<dir>/<config file>` exists: found
//! 2. `<dir>` carries a boundary marker (e.g. `.git`): stop, not found
//! 3. `<dir>` is the filesystem root: stop, not found
//! 4. otherwise continue with the parent
//!
//! # Example
//!
//! ```ignore
//! use langbridge_infrastructure::LocalWorkspace;
//!
//! let workspace = LocalWorkspace::new();
//! let dir = workspace.find_config_upward(&start, &cancel).await?;
//! ```

use async_trait::async_trait;
use langbridge_application::{WorkspaceError, WorkspacePort};
use langbridge_domain::{CONFIG_FILE_NAME, ModuleConfig};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Markers of a version-controlled checkout's root.
pub const DEFAULT_BOUNDARY_MARKERS: &[&str] = &[".git"];

#[derive(Debug, Clone)]
pub struct LocalWorkspace {
    config_file: String,
    boundary_markers: Vec<String>,
}

impl Default for LocalWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalWorkspace {
    pub fn new() -> Self {
        Self {
            config_file: CONFIG_FILE_NAME.to_string(),
            boundary_markers: DEFAULT_BOUNDARY_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }

    pub fn with_config_file(mut self, name: impl Into<String>) -> Self {
        self.config_file = name.into();
        self
    }

    pub fn with_boundary_markers(mut self, markers: Vec<String>) -> Self {
        self.boundary_markers = markers;
        self
    }

    async fn is_boundary(&self, dir: &Path) -> Result<bool, WorkspaceError> {
        for marker in &self.boundary_markers {
            if exists(&dir.join(marker)).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> WorkspaceError {
    WorkspaceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// `lstat`-style existence check; a dangling symlink still exists.
async fn exists(path: &Path) -> Result<bool, WorkspaceError> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error(path, e)),
    }
}

/// Removes `.` and resolves `..` without touching the filesystem.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[async_trait]
impl WorkspacePort for LocalWorkspace {
    fn config_file_name(&self) -> &str {
        &self.config_file
    }

    fn current_dir(&self) -> Result<PathBuf, WorkspaceError> {
        std::env::current_dir().map_err(|e| io_error(Path::new("."), e))
    }

    fn absolute(&self, path: &Path) -> Result<PathBuf, WorkspaceError> {
        if path.is_absolute() {
            return Ok(clean(path));
        }
        Ok(clean(&self.current_dir()?.join(path)))
    }

    async fn find_config_upward(
        &self,
        start: &Path,
        cancel: &CancellationToken,
    ) -> Result<Option<PathBuf>, WorkspaceError> {
        tokio::fs::symlink_metadata(start)
            .await
            .map_err(|e| io_error(start, e))?;

        let mut dir = start.to_path_buf();
        loop {
            if cancel.is_cancelled() {
                return Err(WorkspaceError::Cancelled);
            }
            debug!(path = %dir.display(), "Looking for module configuration");

            if exists(&dir.join(&self.config_file)).await? {
                return Ok(Some(dir));
            }
            if self.is_boundary(&dir).await? {
                debug!(path = %dir.display(), "Reached repository boundary");
                return Ok(None);
            }
            match dir.parent() {
                Some(parent) => dir = parent.to_path_buf(),
                None => return Ok(None),
            }
        }
    }

    async fn read_config(&self, dir: &Path) -> Result<Option<ModuleConfig>, WorkspaceError> {
        let path = dir.join(&self.config_file);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };
        ModuleConfig::parse(&contents)
            .map(Some)
            .map_err(|e| WorkspaceError::InvalidConfig {
                path,
                message: e.to_string(),
            })
    }

    async fn config_exists(&self, dir: &Path) -> Result<bool, WorkspaceError> {
        exists(&dir.join(&self.config_file)).await
    }

    async fn ensure_dir(&self, dir: &Path) -> Result<(), WorkspaceError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| io_error(dir, e))
    }
}
