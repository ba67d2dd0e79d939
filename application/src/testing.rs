//! In-memory fakes of the application ports, for use case tests.

use crate::ports::environment::EnvironmentPort;
use crate::ports::transport::{GraphQlRequest, QueryTransport, TransportError};
use crate::ports::workspace::{WorkspaceError, WorkspacePort};
use async_trait::async_trait;
use langbridge_domain::ModuleConfig;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

type Reply = Result<Value, TransportError>;

/// Transport answering by the first rule whose pattern occurs in the query.
#[derive(Clone, Default)]
pub struct FakeTransport {
    rules: Arc<Mutex<Vec<(String, Reply)>>>,
    requests: Arc<Mutex<Vec<GraphQlRequest>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, pattern: &str, data: Value) -> Self {
        self.rules.lock().unwrap().push((pattern.to_string(), Ok(data)));
        self
    }

    pub fn fail(self, pattern: &str, error: TransportError) -> Self {
        self.rules.lock().unwrap().push((pattern.to_string(), Err(error)));
        self
    }

    pub fn requests(&self) -> Vec<GraphQlRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.query).collect()
    }
}

#[async_trait]
impl QueryTransport for FakeTransport {
    async fn execute(
        &self,
        request: GraphQlRequest,
        cancel: &CancellationToken,
    ) -> Result<Value, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        let reply = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|(pattern, _)| request.query.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone());
        self.requests.lock().unwrap().push(request.clone());
        reply.unwrap_or_else(|| {
            Err(TransportError::GraphQl {
                messages: vec![format!("no fake response for {}", request.query)],
            })
        })
    }
}

/// Workspace backed by a map of configuration directories.
#[derive(Clone)]
pub struct FakeWorkspace {
    cwd: PathBuf,
    configs: HashMap<PathBuf, Value>,
    boundaries: HashSet<PathBuf>,
    created: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeWorkspace {
    pub fn new(cwd: &str) -> Self {
        Self {
            cwd: PathBuf::from(cwd),
            configs: HashMap::new(),
            boundaries: HashSet::new(),
            created: Arc::default(),
        }
    }

    pub fn with_config(mut self, dir: &str, config: Value) -> Self {
        self.configs.insert(PathBuf::from(dir), config);
        self
    }

    pub fn with_boundary(mut self, dir: &str) -> Self {
        self.boundaries.insert(PathBuf::from(dir));
        self
    }

    pub fn created_dirs(&self) -> Vec<PathBuf> {
        self.created.lock().unwrap().clone()
    }
}

fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[async_trait]
impl WorkspacePort for FakeWorkspace {
    fn config_file_name(&self) -> &str {
        "dagger.json"
    }

    fn current_dir(&self) -> Result<PathBuf, WorkspaceError> {
        Ok(self.cwd.clone())
    }

    fn absolute(&self, path: &Path) -> Result<PathBuf, WorkspaceError> {
        Ok(clean(&self.cwd.join(path)))
    }

    async fn find_config_upward(
        &self,
        start: &Path,
        cancel: &CancellationToken,
    ) -> Result<Option<PathBuf>, WorkspaceError> {
        let mut dir = start.to_path_buf();
        loop {
            if cancel.is_cancelled() {
                return Err(WorkspaceError::Cancelled);
            }
            if self.configs.contains_key(&dir) {
                return Ok(Some(dir));
            }
            if self.boundaries.contains(&dir) {
                return Ok(None);
            }
            match dir.parent() {
                Some(parent) => dir = parent.to_path_buf(),
                None => return Ok(None),
            }
        }
    }

    async fn read_config(&self, dir: &Path) -> Result<Option<ModuleConfig>, WorkspaceError> {
        self.configs
            .get(dir)
            .map(|v| {
                serde_json::from_value(v.clone()).map_err(|e| WorkspaceError::InvalidConfig {
                    path: dir.to_path_buf(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    async fn config_exists(&self, dir: &Path) -> Result<bool, WorkspaceError> {
        Ok(self.configs.contains_key(dir))
    }

    async fn ensure_dir(&self, dir: &Path) -> Result<(), WorkspaceError> {
        self.created.lock().unwrap().push(dir.to_path_buf());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeEnvironment {
    vars: HashMap<String, String>,
}

impl FakeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl EnvironmentPort for FakeEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Wraps type definitions the way the introspection query returns them.
pub fn type_defs_response(type_defs: Value) -> Value {
    serde_json::json!({ "typeDefs": type_defs })
}

/// Schema of a `github` module whose constructor takes a secret token.
pub fn github_type_defs() -> Value {
    serde_json::json!([
        {
            "kind": "OBJECT_KIND",
            "asObject": {
                "name": "Query",
                "functions": [
                    { "name": "container", "returnType": { "kind": "OBJECT_KIND", "asObject": { "name": "Container" } } }
                ]
            }
        },
        { "kind": "OBJECT_KIND", "asObject": { "name": "Secret", "functions": [] } },
        {
            "kind": "OBJECT_KIND",
            "asObject": {
                "name": "Github",
                "description": "GitHub API\n\nQuery issues and pull requests.",
                "sourceModuleName": "github",
                "constructor": {
                    "name": "",
                    "returnType": { "kind": "OBJECT_KIND", "asObject": { "name": "Github" } },
                    "args": [
                        { "name": "token", "typeDef": { "kind": "OBJECT_KIND", "asObject": { "name": "Secret" } } }
                    ]
                },
                "functions": [
                    {
                        "name": "issueList",
                        "description": "List open issues",
                        "returnType": { "kind": "STRING_KIND" },
                        "args": [
                            { "name": "repo", "description": "Repository owner/name", "typeDef": { "kind": "STRING_KIND" } },
                            { "name": "state", "typeDef": { "kind": "STRING_KIND" }, "defaultValue": "\"open\"" },
                            { "name": "labels", "typeDef": { "kind": "LIST_KIND", "optional": true, "asList": { "elementTypeDef": { "kind": "STRING_KIND" } } } }
                        ]
                    },
                    {
                        "name": "getIssue",
                        "description": "Fetch one issue",
                        "returnType": { "kind": "OBJECT_KIND", "asObject": { "name": "Issue" } },
                        "args": [
                            { "name": "number", "typeDef": { "kind": "INTEGER_KIND" } }
                        ]
                    },
                    {
                        "name": "withWorkdir",
                        "description": "Attach a working directory",
                        "returnType": { "kind": "OBJECT_KIND", "asObject": { "name": "Github" } },
                        "args": [
                            { "name": "dir", "typeDef": { "kind": "OBJECT_KIND", "asObject": { "name": "Directory" } } }
                        ]
                    }
                ]
            }
        },
        {
            "kind": "OBJECT_KIND",
            "asObject": {
                "name": "Issue",
                "sourceModuleName": "github",
                "fields": [ { "name": "title", "typeDef": { "kind": "STRING_KIND" } } ]
            }
        }
    ])
}

/// Metadata of the `github` module, rooted where the resolver selected it.
pub fn github_metadata_response(resolve_from_caller: bool) -> Value {
    let module = serde_json::json!({
        "asString": "/work/github",
        "asModule": {
            "name": "github",
            "initialize": { "description": "GitHub API\n\nQuery issues and pull requests." },
            "dependencies": []
        }
    });
    if resolve_from_caller {
        serde_json::json!({ "moduleSource": { "resolveFromCaller": module } })
    } else {
        serde_json::json!({ "moduleSource": module })
    }
}
