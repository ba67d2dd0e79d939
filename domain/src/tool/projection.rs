//! Tool projection
//!
//! Decides which functions of a module become tools and what each tool looks
//! like: its name, description and parameters.
//!
//! A function is projected unless it is denylisted, it needs an argument
//! whose type cannot be written as JSON, or an earlier function already took
//! its tool name. Optional arguments of unsupported types are left out of the
//! tool instead of excluding the function. Functions whose signature could
//! not be decoded are reported alongside the other skipped ones.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::entities::{ParamType, ToolDefinition, ToolParameter};
use crate::core::naming::{cli_name, same_object_name};
use crate::module::ModuleDefinition;
use crate::typedef::{FunctionDefinition, FunctionProvider, TypeDefError};

/// Separator between the module name and the function name in a tool name.
pub const TOOL_NAME_SEPARATOR: &str = "_";

/// Functions that are never exposed, keyed by provider.
const DENYLIST: &[(&str, &[&str])] = &[(
    "Query",
    &[
        "builtinContainer",
        "generatedCode",
        "currentFunctionCall",
        "currentModule",
        "typeDef",
        "cacheVolume",
        "setSecret",
        "secret",
        "pipeline",
    ],
)];

/// Whether a provider's function is on the denylist.
pub fn is_denylisted(provider: &str, function: &str) -> bool {
    DENYLIST
        .iter()
        .filter(|(p, _)| same_object_name(p, provider))
        .any(|(_, functions)| functions.contains(&function))
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("{function} is not exposed on {provider}")]
    Denylisted { provider: String, function: String },

    #[error(
        "argument {argument} of {function} has type {type_name}, which cannot be passed as a tool parameter"
    )]
    UnsupportedArgument {
        function: String,
        argument: String,
        type_name: String,
    },

    #[error("{function} maps to the same tool name as {existing}")]
    DuplicateName { function: String, existing: String },

    #[error("signature of {function} could not be decoded: {error}")]
    UndecodedSignature {
        function: String,
        error: TypeDefError,
    },
}

/// A function excluded from projection, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFunction {
    pub name: String,
    pub reason: ProjectionError,
}

/// A function together with the tool it projects to.
#[derive(Debug, Clone)]
pub struct ProjectedTool {
    pub function: Arc<FunctionDefinition>,
    pub definition: ToolDefinition,
}

#[derive(Debug, Clone, Default)]
pub struct Projection {
    pub tools: Vec<ProjectedTool>,
    pub skipped: Vec<SkippedFunction>,
}

/// `<module>_<function>`, with the function in command casing.
pub fn tool_name(module: &ModuleDefinition, function: &FunctionDefinition) -> String {
    format!("{}{}{}", module.name, TOOL_NAME_SEPARATOR, function.cmd_name())
}

/// Module description, then the function's one-line summary.
pub fn tool_description(module: &ModuleDefinition, function: &FunctionDefinition) -> String {
    format!("{}\n{}", module.description, function.short())
}

/// Projects one function, whose types must already be resolved.
pub fn project_function(
    module: &ModuleDefinition,
    function: &FunctionDefinition,
) -> Result<ToolDefinition, ProjectionError> {
    let mut tool = ToolDefinition::new(
        tool_name(module, function),
        tool_description(module, function),
    );
    for arg in &function.args {
        match ParamType::from_type_ref(&arg.type_ref) {
            Some(param_type) => {
                tool = tool.with_parameter(
                    ToolParameter::new(arg.name.clone(), arg.long(), arg.is_required())
                        .with_type(param_type),
                );
            }
            None if arg.is_required() => {
                return Err(ProjectionError::UnsupportedArgument {
                    function: function.name.clone(),
                    argument: arg.name.clone(),
                    type_name: arg.type_ref.to_string(),
                });
            }
            None => {
                debug!(
                    function = %function.name,
                    argument = %arg.name,
                    "Omitting optional argument with unsupported type"
                );
            }
        }
    }
    Ok(tool)
}

/// Projects every eligible function of a provider, in declaration order.
pub fn project_functions(module: &ModuleDefinition, provider: &dyn FunctionProvider) -> Projection {
    let mut projection = Projection::default();
    // Tool name -> function that claimed it.
    let mut claimed: HashMap<String, String> = HashMap::new();

    for function in provider.functions() {
        let name = function.cmd_name().to_string();
        if is_denylisted(provider.provider_name(), &function.name) {
            projection.skipped.push(SkippedFunction {
                name,
                reason: ProjectionError::Denylisted {
                    provider: provider.provider_name().to_string(),
                    function: function.name.clone(),
                },
            });
            continue;
        }
        if let Some(existing) = claimed.get(&name).cloned() {
            projection.skipped.push(SkippedFunction {
                name,
                reason: ProjectionError::DuplicateName {
                    function: function.name.clone(),
                    existing,
                },
            });
            continue;
        }

        module.load_function_type_defs(&function);
        match project_function(module, &function) {
            Ok(definition) => {
                claimed.insert(name, function.name.clone());
                projection.tools.push(ProjectedTool {
                    function,
                    definition,
                });
            }
            Err(reason) => projection.skipped.push(SkippedFunction { name, reason }),
        }
    }

    for undecoded in provider.undecoded() {
        projection.skipped.push(SkippedFunction {
            name: cli_name(&undecoded.name),
            reason: ProjectionError::UndecodedSignature {
                function: undecoded.name.clone(),
                error: undecoded.error.clone(),
            },
        });
    }

    debug!(
        provider = provider.provider_name(),
        tools = projection.tools.len(),
        skipped = projection.skipped.len(),
        "Projected functions"
    );
    projection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspection::RawTypeDef;
    use crate::module::{ModuleMetadata, ModuleSourceRef};
    use crate::tool::entities::PrimitiveType;
    use serde_json::json;

    fn module(name: &str, object: serde_json::Value) -> ModuleDefinition {
        let type_defs: Vec<RawTypeDef> = serde_json::from_value(json!([
            { "kind": "OBJECT_KIND", "asObject": object },
            { "kind": "OBJECT_KIND", "asObject": { "name": "Secret" } },
            { "kind": "OBJECT_KIND", "asObject": { "name": "Directory" } }
        ]))
        .unwrap();
        ModuleDefinition::assemble(
            ModuleMetadata {
                name: name.to_string(),
                description: "GitHub API".to_string(),
                ..Default::default()
            },
            ModuleSourceRef::new("."),
            &type_defs,
        )
        .unwrap()
    }

    fn github() -> ModuleDefinition {
        module(
            "github",
            json!({
                "name": "Github",
                "sourceModuleName": "github",
                "functions": [
                    {
                        "name": "issueList",
                        "description": "List issues\n\nLonger description",
                        "returnType": { "kind": "STRING_KIND" },
                        "args": [
                            { "name": "repo", "description": "Repository", "typeDef": { "kind": "STRING_KIND" } },
                            { "name": "limit", "typeDef": { "kind": "INTEGER_KIND" }, "defaultValue": "30" },
                            { "name": "labels", "typeDef": { "kind": "LIST_KIND", "optional": true, "asList": { "elementTypeDef": { "kind": "STRING_KIND" } } } },
                            { "name": "source", "typeDef": { "kind": "OBJECT_KIND", "optional": true, "asObject": { "name": "Directory" } } }
                        ]
                    },
                    {
                        "name": "issueCreate",
                        "returnType": { "kind": "STRING_KIND" },
                        "args": [
                            { "name": "body", "typeDef": { "kind": "OBJECT_KIND", "asObject": { "name": "Directory" } } }
                        ]
                    },
                    { "name": "issue_list", "returnType": { "kind": "STRING_KIND" } }
                ]
            }),
        )
    }

    #[test]
    fn test_project_function() {
        let module = github();
        let projection = project_functions(&module, &**module.main_object());
        let tool = &projection.tools[0].definition;

        assert_eq!(tool.name, "github_issue-list");
        assert_eq!(tool.description, "GitHub API\nList issues");

        let names: Vec<_> = tool.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["repo", "limit", "labels"]);

        let repo = tool.parameter("repo").unwrap();
        assert!(repo.required);
        assert_eq!(repo.description, "Repository");

        let limit = tool.parameter("limit").unwrap();
        assert!(!limit.required);
        assert_eq!(limit.description, "(default: 30)");
        assert_eq!(limit.param_type, ParamType::Primitive(PrimitiveType::Integer));

        let labels = tool.parameter("labels").unwrap();
        assert_eq!(labels.param_type, ParamType::Array(PrimitiveType::String));
    }

    #[test]
    fn test_required_unsupported_argument_excludes_function() {
        let module = github();
        let projection = project_functions(&module, &**module.main_object());

        let skipped = projection
            .skipped
            .iter()
            .find(|s| s.name == "issue-create")
            .unwrap();
        assert_eq!(
            skipped.reason,
            ProjectionError::UnsupportedArgument {
                function: "issueCreate".to_string(),
                argument: "body".to_string(),
                type_name: "Directory".to_string(),
            }
        );
        assert!(projection.tools.iter().all(|t| t.definition.name != "github_issue-create"));
    }

    #[test]
    fn test_duplicate_tool_name_first_wins() {
        let module = github();
        let projection = project_functions(&module, &**module.main_object());

        assert_eq!(projection.tools.len(), 1);
        let duplicate = projection.skipped.iter().find(|s| s.name == "issue-list").unwrap();
        assert_eq!(
            duplicate.reason,
            ProjectionError::DuplicateName {
                function: "issue_list".to_string(),
                existing: "issueList".to_string(),
            }
        );
    }

    #[test]
    fn test_undecodable_function_is_reported() {
        let module = module(
            "github",
            json!({
                "name": "Github",
                "sourceModuleName": "github",
                "functions": [
                    { "name": "issueList", "returnType": { "kind": "STRING_KIND" } },
                    {
                        "name": "labelMatrix",
                        "returnType": { "kind": "STRING_KIND" },
                        "args": [ { "name": "cells", "typeDef": { "kind": "LIST_KIND" } } ]
                    }
                ]
            }),
        );
        let projection = project_functions(&module, &**module.main_object());

        let names: Vec<_> = projection.tools.iter().map(|t| t.definition.name.as_str()).collect();
        assert_eq!(names, vec!["github_issue-list"]);
        assert_eq!(
            projection.skipped,
            vec![SkippedFunction {
                name: "label-matrix".to_string(),
                reason: ProjectionError::UndecodedSignature {
                    function: "labelMatrix".to_string(),
                    error: TypeDefError::MissingPayload {
                        kind: crate::typedef::TypeKind::List
                    },
                },
            }]
        );
    }

    #[test]
    fn test_denylist() {
        assert!(is_denylisted("Query", "setSecret"));
        assert!(is_denylisted("Query", "pipeline"));
        assert!(!is_denylisted("Query", "container"));
        assert!(!is_denylisted("Github", "setSecret"));
    }

    #[test]
    fn test_denylisted_root_functions_are_skipped() {
        let module = module(
            "",
            json!({
                "name": "Query",
                "functions": [
                    { "name": "setSecret", "returnType": { "kind": "OBJECT_KIND", "asObject": { "name": "Secret" } },
                      "args": [ { "name": "name", "typeDef": { "kind": "STRING_KIND" } } ] },
                    { "name": "version", "returnType": { "kind": "STRING_KIND" } }
                ]
            }),
        );
        let projection = project_functions(&module, &**module.main_object());

        let names: Vec<_> = projection.tools.iter().map(|t| t.definition.name.as_str()).collect();
        assert_eq!(names, vec!["_version"]);
        assert!(matches!(
            projection.skipped[0].reason,
            ProjectionError::Denylisted { .. }
        ));
    }
}
