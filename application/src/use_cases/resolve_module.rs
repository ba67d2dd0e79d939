//! Resolve module use case
//!
//! Turns a module reference into a [`ConfiguredModule`]:
//!
//! 1. **Classify** - ask the engine whether the reference is a git or local source
//! 2. **Named dependency** - a bare name listed as a dependency in the
//!    configuration found upward from the current directory resolves to that
//!    dependency's source
//! 3. **Find up** - otherwise walk upward from a local reference to the nearest
//!    directory with a configuration file, stopping at a repository boundary
//! 4. **Localize** - create the directory if needed, ask the engine for its
//!    context directory and record whether the configuration exists

use crate::config::LoadOptions;
use crate::ports::transport::{GraphQlRequest, QueryTransport, TransportError};
use crate::ports::workspace::{WorkspaceError, WorkspacePort};
use futures::future::BoxFuture;
use langbridge_domain::{
    ConfiguredModule, ModuleSourceRef, QueryBuildError, QueryBuilder, SourceKind,
};
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Reference looked up in the default configuration when searching upward.
const DEFAULT_REFERENCE: &str = ".";

/// Errors that can occur while resolving a module reference
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Unsupported module source kind {kind} for {reference:?}")]
    UnsupportedKind { reference: String, kind: String },

    #[error(
        "No module configuration found in {} or any parent up to the repository root (reference {reference:?})",
        searched.display()
    )]
    ConfigNotFound { reference: String, searched: PathBuf },

    #[error("Workspace error while resolving {reference:?}: {source}")]
    Workspace {
        reference: String,
        #[source]
        source: WorkspaceError,
    },

    #[error("Engine query failed while resolving {reference:?}: {source}")]
    Engine {
        reference: String,
        #[source]
        source: TransportError,
    },

    #[error("Failed to build query for {reference:?}: {source}")]
    Query {
        reference: String,
        #[source]
        source: QueryBuildError,
    },

    #[error("Unexpected engine response while resolving {reference:?}: missing {field}")]
    UnexpectedResponse { reference: String, field: &'static str },

    #[error("Operation cancelled")]
    Cancelled,
}

impl ResolutionError {
    fn workspace(reference: &str, source: WorkspaceError) -> Self {
        match source {
            WorkspaceError::Cancelled => ResolutionError::Cancelled,
            source => ResolutionError::Workspace {
                reference: reference.to_string(),
                source,
            },
        }
    }

    fn engine(reference: &str, source: TransportError) -> Self {
        match source {
            TransportError::Cancelled => ResolutionError::Cancelled,
            source => ResolutionError::Engine {
                reference: reference.to_string(),
                source,
            },
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ResolutionError::Cancelled)
    }
}

/// Use case for resolving a module reference
pub struct ResolveModuleUseCase {
    transport: Arc<dyn QueryTransport>,
    workspace: Arc<dyn WorkspacePort>,
}

impl ResolveModuleUseCase {
    pub fn new(transport: Arc<dyn QueryTransport>, workspace: Arc<dyn WorkspacePort>) -> Self {
        Self {
            transport,
            workspace,
        }
    }

    pub async fn execute(
        &self,
        source: ModuleSourceRef,
        options: &LoadOptions,
        cancel: &CancellationToken,
    ) -> Result<ConfiguredModule, ResolutionError> {
        let mut configured = self.resolve(source, options.find_up, cancel).await?;
        if options.resolve_from_caller && configured.kind == SourceKind::Local {
            configured.source = configured.source.resolving_from_caller();
        }
        info!(
            module = %configured.source,
            kind = %configured.kind,
            config_exists = configured.config_exists,
            "Resolved module source"
        );
        Ok(configured)
    }

    fn resolve<'a>(
        &'a self,
        source: ModuleSourceRef,
        find_up: bool,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<ConfiguredModule, ResolutionError>> {
        Box::pin(async move {
            let kind = self.source_kind(&source, cancel).await?;
            match kind {
                SourceKind::Git => {
                    let exists = self
                        .query_field(&source, "configExists", cancel)
                        .await?
                        .as_bool()
                        .ok_or_else(|| ResolutionError::UnexpectedResponse {
                            reference: source.reference.clone(),
                            field: "configExists",
                        })?;
                    let mut configured = ConfiguredModule::remote(source);
                    configured.config_exists = exists;
                    return Ok(configured);
                }
                SourceKind::Unsupported(kind) => {
                    return Err(ResolutionError::UnsupportedKind {
                        reference: source.reference,
                        kind,
                    });
                }
                SourceKind::Local => {}
            }

            let mut reference = source.reference.clone();
            if find_up {
                if let Some(dependency) = self.named_dependency(&reference, cancel).await? {
                    debug!(
                        reference = %reference,
                        dependency = %dependency.reference,
                        "Reference names a configured dependency"
                    );
                    return self.resolve(dependency, false, cancel).await;
                }

                let start = self
                    .workspace
                    .absolute(Path::new(&reference))
                    .map_err(|e| ResolutionError::workspace(&reference, e))?;
                let found = self
                    .workspace
                    .find_config_upward(&start, cancel)
                    .await
                    .map_err(|e| ResolutionError::workspace(&reference, e))?;
                match found {
                    Some(dir) => reference = dir.to_string_lossy().into_owned(),
                    None => {
                        return Err(ResolutionError::ConfigNotFound {
                            reference,
                            searched: start,
                        });
                    }
                }
            }

            self.localize(&reference, cancel).await
        })
    }

    /// Looks `reference` up as a dependency name in the configuration found
    /// upward from the current directory.
    async fn named_dependency(
        &self,
        reference: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<ModuleSourceRef>, ResolutionError> {
        let ws = |e: WorkspaceError| ResolutionError::workspace(reference, e);
        let start = self.workspace.absolute(Path::new(DEFAULT_REFERENCE)).map_err(ws)?;
        let Some(config_dir) = self
            .workspace
            .find_config_upward(&start, cancel)
            .await
            .map_err(ws)?
        else {
            return Ok(None);
        };
        let Some(config) = self.workspace.read_config(&config_dir).await.map_err(ws)? else {
            return Ok(None);
        };
        let Some(dependency) = config.dependency_by_name(reference) else {
            return Ok(None);
        };

        let mut source = ModuleSourceRef::new(dependency.source.clone())
            .with_pin(dependency.pin.clone().unwrap_or_default());
        if self.source_kind(&source, cancel).await? == SourceKind::Local {
            source.reference = config_dir
                .join(&dependency.source)
                .to_string_lossy()
                .into_owned();
        }
        Ok(Some(source))
    }

    async fn localize(
        &self,
        reference: &str,
        cancel: &CancellationToken,
    ) -> Result<ConfiguredModule, ResolutionError> {
        let ws = |e: WorkspaceError| ResolutionError::workspace(reference, e);
        let path = Path::new(reference);
        let root = self.workspace.absolute(path).map_err(ws)?;

        let relative = if path.is_absolute() {
            let cwd = self.workspace.current_dir().map_err(ws)?;
            relative_path(&cwd, &root)
        } else {
            path.to_path_buf()
        };
        self.workspace.ensure_dir(&relative).await.map_err(ws)?;

        let source = ModuleSourceRef::new(relative.to_string_lossy().into_owned());
        let context = self
            .query_field(&source, "resolveContextPathFromCaller", cancel)
            .await?
            .as_str()
            .map(PathBuf::from)
            .ok_or_else(|| ResolutionError::UnexpectedResponse {
                reference: reference.to_string(),
                field: "resolveContextPathFromCaller",
            })?;
        let config_exists = self.workspace.config_exists(&root).await.map_err(ws)?;

        debug!(
            path = %root.display(),
            context = %context.display(),
            config_exists,
            "Localized module source"
        );
        Ok(ConfiguredModule {
            source,
            kind: SourceKind::Local,
            config_exists,
            local_root: Some(root),
            local_context: Some(context),
        })
    }

    async fn source_kind(
        &self,
        source: &ModuleSourceRef,
        cancel: &CancellationToken,
    ) -> Result<SourceKind, ResolutionError> {
        let kind = self.query_field(source, "kind", cancel).await?;
        kind.as_str()
            .map(SourceKind::from_engine)
            .ok_or_else(|| ResolutionError::UnexpectedResponse {
                reference: source.reference.clone(),
                field: "kind",
            })
    }

    /// Queries one scalar field of a module source.
    async fn query_field(
        &self,
        source: &ModuleSourceRef,
        field: &'static str,
        cancel: &CancellationToken,
    ) -> Result<Value, ResolutionError> {
        let query = source
            .select(QueryBuilder::query())
            .leaf_set(field)
            .build()
            .map_err(|e| ResolutionError::Query {
                reference: source.reference.clone(),
                source: e,
            })?;
        debug!(query = %query, "Querying module source");

        let data = self
            .transport
            .execute(GraphQlRequest::new(query), cancel)
            .await
            .map_err(|e| ResolutionError::engine(&source.reference, e))?;

        let mut node = &data["moduleSource"];
        if source.resolve_from_caller {
            node = &node["resolveFromCaller"];
        }
        Ok(node[field].clone())
    }
}

/// `target` expressed relative to `base`. Both must be absolute and clean.
fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<Component> = base.components().collect();
    let target: Vec<Component> = target.components().collect();
    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeTransport, FakeWorkspace};
    use serde_json::json;

    fn use_case(transport: FakeTransport, workspace: FakeWorkspace) -> ResolveModuleUseCase {
        ResolveModuleUseCase::new(Arc::new(transport), Arc::new(workspace))
    }

    fn kind_response(kind: &str) -> Value {
        json!({ "moduleSource": { "kind": kind } })
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/work/repo"), Path::new("/work/repo/ci")),
            PathBuf::from("ci")
        );
        assert_eq!(
            relative_path(Path::new("/work/repo/ci"), Path::new("/work/lint")),
            PathBuf::from("../../lint")
        );
        assert_eq!(
            relative_path(Path::new("/work"), Path::new("/work")),
            PathBuf::from(".")
        );
    }

    #[tokio::test]
    async fn test_git_source_returns_early() {
        let transport = FakeTransport::new()
            .respond("{kind}", kind_response("GIT_SOURCE"))
            .respond("{configExists}", json!({ "moduleSource": { "configExists": true } }));
        let workspace = FakeWorkspace::new("/work");

        let configured = use_case(transport.clone(), workspace)
            .execute(
                ModuleSourceRef::new("github.com/acme/daggerverse/github").with_pin("abc"),
                &LoadOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(configured.kind, SourceKind::Git);
        assert!(configured.config_exists);
        assert!(configured.local_root.is_none());
        assert!(!configured.source.resolve_from_caller);
        assert_eq!(configured.source.pin.as_deref(), Some("abc"));
        assert!(transport.queries()[0].contains(r#"refPin:"abc""#));
    }

    #[tokio::test]
    async fn test_unsupported_kind() {
        let transport = FakeTransport::new().respond("{kind}", kind_response("DIR_SOURCE"));
        let err = use_case(transport, FakeWorkspace::new("/work"))
            .execute(
                ModuleSourceRef::new("weird"),
                &LoadOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ResolutionError::UnsupportedKind { ref reference, ref kind }
                if reference == "weird" && kind == "DIR_SOURCE"
        ));
    }

    #[tokio::test]
    async fn test_local_source_found_upward() {
        let transport = FakeTransport::new()
            .respond("{kind}", kind_response("LOCAL_SOURCE"))
            .respond(
                "{resolveContextPathFromCaller}",
                json!({ "moduleSource": { "resolveContextPathFromCaller": "/work" } }),
            );
        let workspace = FakeWorkspace::new("/work/ci/sub").with_config("/work/ci", json!({ "name": "ci" }));

        let configured = use_case(transport, workspace.clone())
            .execute(
                ModuleSourceRef::new("."),
                &LoadOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(configured.kind, SourceKind::Local);
        assert!(configured.config_exists);
        assert_eq!(configured.local_root, Some(PathBuf::from("/work/ci")));
        assert_eq!(configured.local_context, Some(PathBuf::from("/work")));
        assert_eq!(configured.source.reference, "..");
        assert!(configured.source.resolve_from_caller);
        assert_eq!(workspace.created_dirs(), vec![PathBuf::from("..")]);
    }

    #[tokio::test]
    async fn test_local_source_not_found() {
        let transport = FakeTransport::new().respond("{kind}", kind_response("LOCAL_SOURCE"));
        let workspace = FakeWorkspace::new("/work/ci");

        let err = use_case(transport, workspace)
            .execute(
                ModuleSourceRef::new("./ci"),
                &LoadOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        match err {
            ResolutionError::ConfigNotFound {
                reference,
                searched,
            } => {
                assert_eq!(reference, "./ci");
                assert_eq!(searched, PathBuf::from("/work/ci/ci"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_repository_boundary_stops_search() {
        let transport = FakeTransport::new().respond("{kind}", kind_response("LOCAL_SOURCE"));
        let workspace = FakeWorkspace::new("/work/repo/ci")
            .with_config("/work", json!({ "name": "outer" }))
            .with_boundary("/work/repo");

        let err = use_case(transport, workspace.clone())
            .execute(
                ModuleSourceRef::new("."),
                &LoadOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ResolutionError::ConfigNotFound { ref reference, ref searched }
                if reference == "." && searched == Path::new("/work/repo/ci")
        ));
        assert!(workspace.created_dirs().is_empty());
    }

    #[tokio::test]
    async fn test_named_dependency_resolves_to_its_source() {
        let transport = FakeTransport::new()
            .respond("{kind}", kind_response("LOCAL_SOURCE"))
            .respond(
                "{resolveContextPathFromCaller}",
                json!({ "moduleSource": { "resolveContextPathFromCaller": "/work" } }),
            );
        let workspace = FakeWorkspace::new("/work")
            .with_config(
                "/work",
                json!({ "name": "app", "dependencies": [ { "name": "lint", "source": "tools/lint" } ] }),
            )
            .with_config("/work/tools/lint", json!({ "name": "lint" }));

        let configured = use_case(transport, workspace)
            .execute(
                ModuleSourceRef::new("lint"),
                &LoadOptions::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(configured.local_root, Some(PathBuf::from("/work/tools/lint")));
        assert_eq!(configured.source.reference, "tools/lint");
        assert!(configured.config_exists);
    }

    #[tokio::test]
    async fn test_without_find_up_uses_reference_as_is() {
        let transport = FakeTransport::new()
            .respond("{kind}", kind_response("LOCAL_SOURCE"))
            .respond(
                "{resolveContextPathFromCaller}",
                json!({ "moduleSource": { "resolveContextPathFromCaller": "/work" } }),
            );
        let workspace = FakeWorkspace::new("/work");

        let configured = use_case(transport, workspace)
            .execute(
                ModuleSourceRef::new("new-module"),
                &LoadOptions::default().with_find_up(false),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(!configured.config_exists);
        assert!(!configured.fully_initialized());
        assert_eq!(configured.local_root, Some(PathBuf::from("/work/new-module")));
    }

    #[tokio::test]
    async fn test_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = use_case(FakeTransport::new(), FakeWorkspace::new("/work"))
            .execute(ModuleSourceRef::new("."), &LoadOptions::default(), &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
