//! Nested query builder
//!
//! Builds a single-path GraphQL query: a chain of field selections, each with
//! its own arguments, optionally closed by a raw selection set. Arguments are
//! kept sorted by name so the same call always produces the same text.
//!
//! ```
//! use langbridge_domain::query::QueryBuilder;
//! use serde_json::json;
//!
//! let query = QueryBuilder::query()
//!     .select("github")
//!     .arg("token", json!("t0k3n"))
//!     .select("issueList")
//!     .arg("repo", json!("acme/widgets"))
//!     .build()
//!     .unwrap();
//! assert_eq!(query, r#"query{github(token:"t0k3n"){issueList(repo:"acme/widgets")}}"#);
//! ```

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryBuildError {
    #[error("query has no field selections")]
    NoSelection,

    #[error("argument {0:?} was added before any field was selected")]
    ArgumentWithoutSelection(String),

    #[error("{0:?} is not a valid GraphQL name")]
    InvalidName(String),
}

#[derive(Debug, Clone)]
struct Selection {
    field: String,
    args: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    selections: Vec<Selection>,
    leaf: Option<String>,
    dangling: Option<String>,
}

impl QueryBuilder {
    pub fn query() -> Self {
        Self::default()
    }

    /// Selects a field on the previously selected one.
    pub fn select(mut self, field: impl Into<String>) -> Self {
        self.selections.push(Selection {
            field: field.into(),
            args: BTreeMap::new(),
        });
        self
    }

    /// Adds an argument to the last selected field.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        match self.selections.last_mut() {
            Some(selection) => {
                selection.args.insert(name, value.into());
            }
            None => {
                self.dangling.get_or_insert(name);
            }
        }
        self
    }

    pub fn args<I, K>(self, args: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        args.into_iter().fold(self, |q, (k, v)| q.arg(k, v))
    }

    /// Closes the query with a raw selection set on the last field, e.g.
    /// `id` or `kind configExists`.
    pub fn leaf_set(mut self, selection_set: impl Into<String>) -> Self {
        self.leaf = Some(selection_set.into());
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.selections.iter().map(|s| s.field.as_str())
    }

    /// Arguments bound to the first selection of `field`.
    pub fn arguments_of(&self, field: &str) -> Option<&BTreeMap<String, Value>> {
        self.selections
            .iter()
            .find(|s| s.field == field)
            .map(|s| &s.args)
    }

    pub fn build(&self) -> Result<String, QueryBuildError> {
        if let Some(name) = &self.dangling {
            return Err(QueryBuildError::ArgumentWithoutSelection(name.clone()));
        }
        if self.selections.is_empty() {
            return Err(QueryBuildError::NoSelection);
        }

        let mut out = String::from("query");
        for selection in &self.selections {
            validate_name(&selection.field)?;
            out.push('{');
            out.push_str(&selection.field);
            if !selection.args.is_empty() {
                out.push('(');
                for (i, (name, value)) in selection.args.iter().enumerate() {
                    validate_name(name)?;
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(name);
                    out.push(':');
                    write_value(&mut out, value)?;
                }
                out.push(')');
            }
        }
        if let Some(leaf) = &self.leaf {
            out.push('{');
            out.push_str(leaf);
            out.push('}');
        }
        for _ in &self.selections {
            out.push('}');
        }
        Ok(out)
    }
}

fn validate_name(name: &str) -> Result<(), QueryBuildError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(QueryBuildError::InvalidName(name.to_string()))
    }
}

/// Writes a JSON value as a GraphQL literal. Strings use JSON escaping, which
/// GraphQL string literals accept. Object keys are written unquoted.
fn write_value(out: &mut String, value: &Value) -> Result<(), QueryBuildError> {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            out.push_str(&value.to_string());
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                validate_name(key)?;
                if i > 0 {
                    out.push(',');
                }
                out.push_str(key);
                out.push(':');
                write_value(out, item)?;
            }
            out.push('}');
        }
    }
    Ok(())
}
