//! Load module use case
//!
//! Serves a resolved module on the engine, then introspects it:
//!
//! 1. **Serve** - make the module's types part of the engine's schema
//! 2. **Metadata** - name, description, dependencies and canonical reference
//! 3. **Type definitions** - every object, interface, enum and input
//! 4. **Assemble** - build the [`ModuleDefinition`] around its main object

use crate::ports::transport::{GraphQlRequest, QueryTransport, TransportError};
use langbridge_domain::{
    ConfiguredModule, ModuleDefinition, ModuleError, ModuleMetadata, QueryBuildError, QueryBuilder,
    RawModuleSource, RawTypeDef,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Full introspection document for the served schema.
const TYPE_DEFS_QUERY: &str = include_str!("../queries/type_defs.graphql");

/// Selection set applied to the module source for its metadata.
const MODULE_METADATA_SELECTION: &str = include_str!("../queries/module_metadata.graphql");

/// Errors that can occur while loading a module's schema
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to serve module {module}: {source}")]
    Serve {
        module: String,
        #[source]
        source: TransportError,
    },

    #[error("Failed to query metadata of module {module}: {source}")]
    Metadata {
        module: String,
        #[source]
        source: TransportError,
    },

    #[error("Failed to query type definitions of module {module}: {source}")]
    TypeDefs {
        module: String,
        #[source]
        source: TransportError,
    },

    #[error("Malformed introspection response for module {module}: {message}")]
    Decode { module: String, message: String },

    #[error("Failed to build query for module {module}: {source}")]
    Query {
        module: String,
        #[source]
        source: QueryBuildError,
    },

    #[error(transparent)]
    Module(#[from] ModuleError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl SchemaError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SchemaError::Cancelled)
    }
}

/// Collapses a multi-line selection into one line.
fn compact(selection: &str) -> String {
    selection.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Use case for loading a module definition
pub struct LoadModuleUseCase {
    transport: Arc<dyn QueryTransport>,
}

impl LoadModuleUseCase {
    pub fn new(transport: Arc<dyn QueryTransport>) -> Self {
        Self { transport }
    }

    pub async fn execute(
        &self,
        configured: &ConfiguredModule,
        cancel: &CancellationToken,
    ) -> Result<ModuleDefinition, SchemaError> {
        let module = configured.source.to_string();

        self.serve(configured, cancel).await?;
        let metadata = self.metadata(configured, cancel).await?;
        let type_defs = self.type_defs(&module, cancel).await?;
        debug!(module = %module, type_defs = type_defs.len(), "Introspected module");

        let definition =
            ModuleDefinition::assemble(metadata, configured.source.clone(), &type_defs)?;
        info!(
            module = %definition.name,
            mod_ref = %definition.mod_ref,
            dependencies = definition.dependencies.len(),
            "Loaded module"
        );
        Ok(definition)
    }

    async fn serve(
        &self,
        configured: &ConfiguredModule,
        cancel: &CancellationToken,
    ) -> Result<(), SchemaError> {
        let module = configured.source.to_string();
        let query = self.source_query(configured, "asModule { initialize { serve } }")?;
        debug!(module = %module, query = %query, "Serving module");
        self.transport
            .execute(GraphQlRequest::new(query), cancel)
            .await
            .map_err(|source| match source {
                TransportError::Cancelled => SchemaError::Cancelled,
                source => SchemaError::Serve { module, source },
            })?;
        Ok(())
    }

    async fn metadata(
        &self,
        configured: &ConfiguredModule,
        cancel: &CancellationToken,
    ) -> Result<ModuleMetadata, SchemaError> {
        let module = configured.source.to_string();
        let query = self.source_query(configured, &compact(MODULE_METADATA_SELECTION))?;
        let data = self
            .transport
            .execute(GraphQlRequest::new(query), cancel)
            .await
            .map_err(|source| match source {
                TransportError::Cancelled => SchemaError::Cancelled,
                source => SchemaError::Metadata {
                    module: module.clone(),
                    source,
                },
            })?;

        let mut node = &data["moduleSource"];
        if configured.source.resolve_from_caller {
            node = &node["resolveFromCaller"];
        }
        let raw: RawModuleSource =
            serde_json::from_value(node.clone()).map_err(|e| SchemaError::Decode {
                module,
                message: e.to_string(),
            })?;
        Ok(ModuleMetadata::from(raw))
    }

    async fn type_defs(
        &self,
        module: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawTypeDef>, SchemaError> {
        let request = GraphQlRequest::new(TYPE_DEFS_QUERY).with_operation_name("TypeDefs");
        let mut data = self
            .transport
            .execute(request, cancel)
            .await
            .map_err(|source| match source {
                TransportError::Cancelled => SchemaError::Cancelled,
                source => SchemaError::TypeDefs {
                    module: module.to_string(),
                    source,
                },
            })?;

        serde_json::from_value(data["typeDefs"].take()).map_err(|e| SchemaError::Decode {
            module: module.to_string(),
            message: e.to_string(),
        })
    }

    fn source_query(
        &self,
        configured: &ConfiguredModule,
        selection: &str,
    ) -> Result<String, SchemaError> {
        configured
            .source
            .select(QueryBuilder::query())
            .leaf_set(selection)
            .build()
            .map_err(|source| SchemaError::Query {
                module: configured.source.to_string(),
                source,
            })
    }
}
