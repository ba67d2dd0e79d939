//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod environment;
pub mod tool_schema;
pub mod transport;
pub mod workspace;
