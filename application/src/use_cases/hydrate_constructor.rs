//! Hydrate constructor use case
//!
//! Binds a module's constructor arguments from environment variables named
//! `<MODULE>_<ARG>`. Secret arguments are registered on the engine and bound
//! by handle; their plaintext travels only as a GraphQL variable.

use crate::ports::environment::EnvironmentPort;
use crate::ports::transport::{GraphQlRequest, QueryTransport, TransportError};
use langbridge_domain::{ArgumentDefinition, ModuleDefinition, TypeShape, env_var_name};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Name of the platform object holding sensitive values.
const SECRET_OBJECT: &str = "Secret";

const SET_SECRET_QUERY: &str = "query SetSecret($name: String!, $plaintext: String!) { setSecret(name: $name, plaintext: $plaintext) { id } }";

/// Errors that can occur while hydrating a constructor
#[derive(Error, Debug)]
pub enum HydrationError {
    #[error("{variable:?} not set (required by argument {argument:?} of module {module:?})")]
    MissingVariable {
        module: String,
        argument: String,
        variable: String,
    },

    #[error("unsupported type {type_name} for argument {argument:?} of module {module:?}")]
    UnsupportedType {
        module: String,
        argument: String,
        type_name: String,
    },

    #[error("{variable:?} is not a valid {expected} (argument {argument:?} of module {module:?})")]
    InvalidValue {
        module: String,
        argument: String,
        variable: String,
        expected: &'static str,
    },

    #[error("failed to register secret {variable:?}: {source}")]
    Secret {
        variable: String,
        #[source]
        source: TransportError,
    },

    #[error("engine returned no handle for secret {variable:?}")]
    SecretResponse { variable: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl HydrationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, HydrationError::Cancelled)
    }
}

/// Opaque engine reference to a registered secret.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretHandle {
    id: String,
}

impl SecretHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Debug for SecretHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretHandle(..)")
    }
}

/// A constructor argument value ready to be bound in a query.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Plain(Value),
    Secret(SecretHandle),
}

impl BoundValue {
    fn to_query_value(&self) -> Value {
        match self {
            BoundValue::Plain(value) => value.clone(),
            BoundValue::Secret(handle) => Value::String(handle.id.clone()),
        }
    }
}

/// Constructor arguments bound once per module, shared by all of its tools.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments(BTreeMap<String, BoundValue>);

impl BoundArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: BoundValue) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&BoundValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Arguments as query literals; secrets appear as their handle.
    pub fn to_query_args(&self) -> Map<String, Value> {
        self.0
            .iter()
            .map(|(name, value)| (name.clone(), value.to_query_value()))
            .collect()
    }
}

/// Use case for binding constructor arguments from the environment
pub struct HydrateConstructorUseCase {
    transport: Arc<dyn QueryTransport>,
    environment: Arc<dyn EnvironmentPort>,
}

impl HydrateConstructorUseCase {
    pub fn new(transport: Arc<dyn QueryTransport>, environment: Arc<dyn EnvironmentPort>) -> Self {
        Self {
            transport,
            environment,
        }
    }

    pub async fn execute(
        &self,
        module: &ModuleDefinition,
        cancel: &CancellationToken,
    ) -> Result<BoundArguments, HydrationError> {
        let mut bound = BoundArguments::new();
        for arg in &module.constructor().args {
            let variable = env_var_name(&module.name, &arg.name);
            debug!(
                module = %module.name,
                argument = %arg.name,
                variable = %variable,
                "Loading constructor argument"
            );

            let Some(raw) = self.environment.var(&variable).filter(|v| !v.is_empty()) else {
                if arg.is_required() {
                    return Err(HydrationError::MissingVariable {
                        module: module.name.clone(),
                        argument: arg.name.clone(),
                        variable,
                    });
                }
                continue;
            };

            let value = self.bind(module, arg, variable, raw, cancel).await?;
            bound.insert(arg.name.clone(), value);
        }
        Ok(bound)
    }

    async fn bind(
        &self,
        module: &ModuleDefinition,
        arg: &ArgumentDefinition,
        variable: String,
        raw: String,
        cancel: &CancellationToken,
    ) -> Result<BoundValue, HydrationError> {
        let invalid = |expected: &'static str| HydrationError::InvalidValue {
            module: module.name.clone(),
            argument: arg.name.clone(),
            variable: variable.clone(),
            expected,
        };

        match &arg.type_ref.shape {
            TypeShape::String => Ok(BoundValue::Plain(Value::String(raw))),
            TypeShape::Integer => raw
                .trim()
                .parse::<i64>()
                .map(|n| BoundValue::Plain(Value::from(n)))
                .map_err(|_| invalid("integer")),
            TypeShape::Boolean => raw
                .trim()
                .parse::<bool>()
                .map(|b| BoundValue::Plain(Value::Bool(b)))
                .map_err(|_| invalid("boolean")),
            TypeShape::Object(link) if link.name() == SECRET_OBJECT => {
                let handle = self
                    .set_secret(&variable, SecretString::from(raw), cancel)
                    .await?;
                Ok(BoundValue::Secret(handle))
            }
            _ => Err(HydrationError::UnsupportedType {
                module: module.name.clone(),
                argument: arg.name.clone(),
                type_name: arg.type_ref.to_string(),
            }),
        }
    }

    async fn set_secret(
        &self,
        variable: &str,
        plaintext: SecretString,
        cancel: &CancellationToken,
    ) -> Result<SecretHandle, HydrationError> {
        let request = GraphQlRequest::new(SET_SECRET_QUERY)
            .with_operation_name("SetSecret")
            .with_variable("name", variable)
            .with_variable("plaintext", plaintext.expose_secret());

        let data = self
            .transport
            .execute(request, cancel)
            .await
            .map_err(|source| match source {
                TransportError::Cancelled => HydrationError::Cancelled,
                source => HydrationError::Secret {
                    variable: variable.to_string(),
                    source,
                },
            })?;

        data["setSecret"]["id"]
            .as_str()
            .map(SecretHandle::new)
            .ok_or_else(|| HydrationError::SecretResponse {
                variable: variable.to_string(),
            })
    }
}
