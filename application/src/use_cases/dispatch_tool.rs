//! Dispatch tool use case
//!
//! Invokes one tool: parse the raw argument text, build the nested query,
//! execute it and hand back the response data as a JSON string. Calls are
//! independent and never retried.

use super::load_tools::ToolSet;
use crate::ports::transport::{GraphQlRequest, QueryTransport, TransportError};
use langbridge_domain::{QueryBuildError, ToolCall, ToolCallError};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("unknown tool {name:?}")]
    UnknownTool { name: String },

    #[error(transparent)]
    MalformedArguments(#[from] ToolCallError),

    #[error("failed to build query for tool {tool:?}: {source}")]
    QueryBuild {
        tool: String,
        #[source]
        source: QueryBuildError,
    },

    #[error("tool {tool:?} failed: {source}")]
    Execution {
        tool: String,
        #[source]
        source: TransportError,
    },

    #[error("failed to encode result of tool {tool:?}: {message}")]
    Encode { tool: String, message: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl DispatchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DispatchError::Cancelled)
    }
}

/// Use case for invoking tools of a loaded tool set
pub struct DispatchToolUseCase {
    transport: Arc<dyn QueryTransport>,
    tools: Arc<ToolSet>,
}

impl DispatchToolUseCase {
    pub fn new(transport: Arc<dyn QueryTransport>, tools: Arc<ToolSet>) -> Self {
        Self { transport, tools }
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    /// Invokes `name` with raw JSON argument text, as produced by a model.
    pub async fn call(
        &self,
        name: &str,
        raw_arguments: &str,
        cancel: &CancellationToken,
    ) -> Result<String, DispatchError> {
        if self.tools.get(name).is_none() {
            return Err(DispatchError::UnknownTool {
                name: name.to_string(),
            });
        }
        let call = ToolCall::parse(name, raw_arguments)?;
        self.call_value(&call.tool_name, call.arguments, cancel).await
    }

    /// Invokes `name` with already-structured arguments.
    pub async fn call_value(
        &self,
        name: &str,
        arguments: Map<String, Value>,
        cancel: &CancellationToken,
    ) -> Result<String, DispatchError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| DispatchError::UnknownTool {
                name: name.to_string(),
            })?;

        let query = tool
            .build_query(&arguments)
            .map_err(|source| DispatchError::QueryBuild {
                tool: name.to_string(),
                source,
            })?;
        debug!(tool = %name, query = %query, "Dispatching tool call");

        let data = self
            .transport
            .execute(GraphQlRequest::new(query), cancel)
            .await
            .map_err(|source| match source {
                TransportError::Cancelled => DispatchError::Cancelled,
                source => DispatchError::Execution {
                    tool: name.to_string(),
                    source,
                },
            })?;

        let output = serde_json::to_string(&data).map_err(|e| DispatchError::Encode {
            tool: name.to_string(),
            message: e.to_string(),
        })?;
        info!(tool = %name, bytes = output.len(), "Tool call completed");
        Ok(output)
    }
}
