//! Load tools use case
//!
//! Runs the whole pipeline for each requested module reference and gathers
//! the resulting tools into one [`ToolSet`]:
//!
//! ```text
//! reference ──resolve──▶ ConfiguredModule ──load──▶ ModuleDefinition
//!                                                        │
//!                                 hydrate constructor ◀──┤
//!                                                        ▼
//!                                       project main-object functions
//! ```
//!
//! Modules are loaded concurrently. Any resolution, schema or hydration
//! failure aborts the whole load; functions that cannot be projected are
//! reported as skipped.

use super::hydrate_constructor::{BoundArguments, HydrateConstructorUseCase, HydrationError};
use super::load_module::{LoadModuleUseCase, SchemaError};
use super::resolve_module::{ResolutionError, ResolveModuleUseCase};
use crate::config::LoadOptions;
use crate::ports::environment::EnvironmentPort;
use crate::ports::tool_schema::ToolSchemaPort;
use crate::ports::transport::QueryTransport;
use crate::ports::workspace::WorkspacePort;
use futures::future::try_join_all;
use langbridge_domain::{
    FunctionDefinition, ModuleDefinition, ModuleSourceRef, ProjectionError, QueryBuildError,
    QueryBuilder, ToolDefinition, project_functions,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A module function exposed as a tool, with its constructor arguments bound.
#[derive(Debug, Clone)]
pub struct Tool {
    pub module: Arc<ModuleDefinition>,
    pub function: Arc<FunctionDefinition>,
    pub bound: Arc<BoundArguments>,
    pub definition: ToolDefinition,
}

impl Tool {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Builds the nested query invoking this tool with `arguments`.
    ///
    /// The module is selected first with its bound constructor arguments,
    /// then the function with the call's arguments under their original
    /// names. Object results select their `id`.
    pub fn build_query(&self, arguments: &Map<String, Value>) -> Result<String, QueryBuildError> {
        let mut query = QueryBuilder::query();
        if let Some(field) = self.module.constructor_field() {
            query = query
                .select(field)
                .args(self.bound.to_query_args());
        }
        query = query
            .select(&self.function.name)
            .args(arguments.iter().map(|(k, v)| (k.clone(), v.clone())));
        if self.function.return_type.is_composite() {
            query = query.leaf_set("id");
        }
        query.build()
    }
}

/// A function left out of the tool set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTool {
    pub module: String,
    pub function: String,
    pub reason: ProjectionError,
}

/// Tools of one or more modules, keyed by canonical name.
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    tools: BTreeMap<String, Tool>,
    skipped: Vec<SkippedTool>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tool: Tool) -> Result<(), LoadToolsError> {
        if self.tools.contains_key(tool.name()) {
            return Err(LoadToolsError::DuplicateTool {
                name: tool.name().to_string(),
            });
        }
        self.tools.insert(tool.name().to_string(), tool);
        Ok(())
    }

    pub fn extend(&mut self, other: ToolSet) -> Result<(), LoadToolsError> {
        for tool in other.tools.into_values() {
            self.insert(tool)?;
        }
        self.skipped.extend(other.skipped);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition.clone()).collect()
    }

    pub fn skipped(&self) -> &[SkippedTool] {
        &self.skipped
    }

    /// Schemas of every tool in the given protocol's shape.
    pub fn schemas(&self, converter: &dyn ToolSchemaPort) -> Vec<Value> {
        converter.all_tools_schema(&self.definitions())
    }
}

#[derive(Error, Debug)]
pub enum LoadToolsError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Hydration(#[from] HydrationError),

    #[error("tool {name:?} is provided by more than one module")]
    DuplicateTool { name: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl LoadToolsError {
    pub fn is_cancelled(&self) -> bool {
        match self {
            LoadToolsError::Cancelled => true,
            LoadToolsError::Resolution(e) => e.is_cancelled(),
            LoadToolsError::Schema(e) => e.is_cancelled(),
            LoadToolsError::Hydration(e) => e.is_cancelled(),
            LoadToolsError::DuplicateTool { .. } => false,
        }
    }
}

/// Input for the LoadTools use case
#[derive(Debug, Clone, Default)]
pub struct LoadToolsInput {
    pub modules: Vec<ModuleSourceRef>,
    pub options: LoadOptions,
}

impl LoadToolsInput {
    pub fn new(modules: impl IntoIterator<Item = ModuleSourceRef>) -> Self {
        Self {
            modules: modules.into_iter().collect(),
            options: LoadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }
}

/// Use case for turning module references into a tool set
pub struct LoadToolsUseCase {
    resolve: ResolveModuleUseCase,
    load: LoadModuleUseCase,
    hydrate: HydrateConstructorUseCase,
}

impl LoadToolsUseCase {
    pub fn new(
        transport: Arc<dyn QueryTransport>,
        workspace: Arc<dyn WorkspacePort>,
        environment: Arc<dyn EnvironmentPort>,
    ) -> Self {
        Self {
            resolve: ResolveModuleUseCase::new(transport.clone(), workspace),
            load: LoadModuleUseCase::new(transport.clone()),
            hydrate: HydrateConstructorUseCase::new(transport, environment),
        }
    }

    pub async fn execute(
        &self,
        input: LoadToolsInput,
        cancel: &CancellationToken,
    ) -> Result<ToolSet, LoadToolsError> {
        if cancel.is_cancelled() {
            return Err(LoadToolsError::Cancelled);
        }

        let sets = try_join_all(
            input
                .modules
                .iter()
                .map(|source| self.load_one(source, &input.options, cancel)),
        )
        .await?;

        let mut tools = ToolSet::new();
        for set in sets {
            tools.extend(set)?;
        }
        info!(
            modules = input.modules.len(),
            tools = tools.len(),
            skipped = tools.skipped().len(),
            "Loaded tools"
        );
        Ok(tools)
    }

    async fn load_one(
        &self,
        source: &ModuleSourceRef,
        options: &LoadOptions,
        cancel: &CancellationToken,
    ) -> Result<ToolSet, LoadToolsError> {
        let configured = self.resolve.execute(source.clone(), options, cancel).await?;
        let module = Arc::new(self.load.execute(&configured, cancel).await?);

        let bound = if options.hydrate_from_env {
            self.hydrate.execute(&module, cancel).await?
        } else {
            BoundArguments::new()
        };
        let bound = Arc::new(bound);

        let projection = project_functions(&module, &**module.main_object());
        let mut tools = ToolSet::new();
        for skipped in projection.skipped {
            debug!(
                module = %module.name,
                function = %skipped.name,
                reason = %skipped.reason,
                "Skipped function"
            );
            tools.skipped.push(SkippedTool {
                module: module.name.clone(),
                function: skipped.name,
                reason: skipped.reason,
            });
        }
        for projected in projection.tools {
            tools.insert(Tool {
                module: module.clone(),
                function: projected.function,
                bound: bound.clone(),
                definition: projected.definition,
            })?;
        }
        Ok(tools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        FakeEnvironment, FakeTransport, FakeWorkspace, github_metadata_response,
        github_type_defs, type_defs_response,
    };
    use serde_json::json;

    fn github_transport() -> FakeTransport {
        FakeTransport::new()
            .respond("currentTypeDefs", type_defs_response(github_type_defs()))
            .respond("serve", json!({}))
            .respond("setSecret", json!({ "setSecret": { "id": "secret:abc123" } }))
            .respond("asString", github_metadata_response(true))
            .respond(
                "resolveContextPathFromCaller",
                json!({ "moduleSource": { "resolveContextPathFromCaller": "/work" } }),
            )
            .respond("kind", json!({ "moduleSource": { "kind": "LOCAL_SOURCE" } }))
    }

    fn github_workspace() -> FakeWorkspace {
        FakeWorkspace::new("/work").with_config("/work/github", json!({ "name": "github" }))
    }

    async fn load_github(transport: &FakeTransport) -> ToolSet {
        let env = FakeEnvironment::new().with_var("GITHUB_TOKEN", "ghp_plaintext");
        LoadToolsUseCase::new(
            Arc::new(transport.clone()),
            Arc::new(github_workspace()),
            Arc::new(env),
        )
        .execute(
            LoadToolsInput::new([ModuleSourceRef::new("./github")]),
            &CancellationToken::new(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_github_tools() {
        let tools = load_github(&github_transport()).await;

        let names: Vec<&str> = tools.iter().map(Tool::name).collect();
        assert_eq!(names, vec!["github_get-issue", "github_issue-list"]);

        let issue_list = tools.get("github_issue-list").unwrap();
        assert_eq!(
            issue_list.definition.description,
            "GitHub API\n\nQuery issues and pull requests.\nList open issues"
        );
        assert!(issue_list.definition.parameter("repo").unwrap().required);
        assert!(!issue_list.definition.parameter("state").unwrap().required);
        assert!(!issue_list.definition.parameter("labels").unwrap().required);

        let skipped = tools.skipped();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].function, "with-workdir");
        assert!(matches!(
            skipped[0].reason,
            ProjectionError::UnsupportedArgument { .. }
        ));
    }

    #[tokio::test]
    async fn test_build_query_uses_original_argument_names() {
        let tools = load_github(&github_transport()).await;
        let tool = tools.get("github_issue-list").unwrap();

        let arguments = json!({ "repo": "acme/widgets" });
        let query = tool.build_query(arguments.as_object().unwrap()).unwrap();
        assert_eq!(
            query,
            r#"query{github(token:"secret:abc123"){issueList(repo:"acme/widgets")}}"#
        );

        let get_issue = tools.get("github_get-issue").unwrap();
        let arguments = json!({ "number": 42 });
        let query = get_issue.build_query(arguments.as_object().unwrap()).unwrap();
        assert_eq!(
            query,
            r#"query{github(token:"secret:abc123"){getIssue(number:42){id}}}"#
        );
    }

    #[tokio::test]
    async fn test_hydration_failure_aborts_load() {
        let err = LoadToolsUseCase::new(
            Arc::new(github_transport()),
            Arc::new(github_workspace()),
            Arc::new(FakeEnvironment::new()),
        )
        .execute(
            LoadToolsInput::new([ModuleSourceRef::new("./github")]),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, LoadToolsError::Hydration(_)));
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }

    #[tokio::test]
    async fn test_duplicate_tools_across_modules() {
        let tools = load_github(&github_transport()).await;
        let mut merged = tools.clone();

        let err = merged.extend(tools).unwrap_err();
        assert!(matches!(err, LoadToolsError::DuplicateTool { name } if name == "github_get-issue"));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = LoadToolsUseCase::new(
            Arc::new(github_transport()),
            Arc::new(github_workspace()),
            Arc::new(FakeEnvironment::new()),
        )
        .execute(LoadToolsInput::new([ModuleSourceRef::new("./github")]), &cancel)
        .await
        .unwrap_err();
        assert!(err.is_cancelled());
    }
}
