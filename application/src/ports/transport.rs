//! Query transport port
//!
//! Defines the interface for sending GraphQL documents to the engine.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that can occur while talking to the engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Engine returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Engine returned errors: {}", .messages.join("; "))]
    GraphQl { messages: Vec<String> },

    #[error("Malformed engine response: {0}")]
    InvalidResponse(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl TransportError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransportError::Cancelled)
    }
}

/// A GraphQL document plus its variables.
///
/// Variables may carry secret plaintext, so `Debug` lists their names only.
#[derive(Clone, Default)]
pub struct GraphQlRequest {
    pub query: String,
    pub variables: Map<String, Value>,
    pub operation_name: Option<String>,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Map::new(),
            operation_name: None,
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}

impl fmt::Debug for GraphQlRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphQlRequest")
            .field("query", &self.query)
            .field("variables", &self.variables.keys().collect::<Vec<_>>())
            .field("operation_name", &self.operation_name)
            .finish()
    }
}

/// Transport to the engine's GraphQL endpoint
///
/// Implementations must be safe to share between concurrent module loads and
/// tool calls.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    /// Execute a request and return its `data` payload.
    async fn execute(
        &self,
        request: GraphQlRequest,
        cancel: &CancellationToken,
    ) -> Result<Value, TransportError>;
}
