//! Function provider trait
//!
//! Objects and interfaces both expose callable functions. Anything that walks
//! a module's API (tool projection, function lookup) goes through this trait
//! rather than matching on the concrete definition.

use std::sync::Arc;

use super::definitions::{FunctionDefinition, UndecodedFunction};

pub trait FunctionProvider: Send + Sync {
    /// Schema name of the provider (e.g. `Github`, `Query`).
    fn provider_name(&self) -> &str;

    /// All callable functions, including zero-argument field accessors.
    fn functions(&self) -> Vec<Arc<FunctionDefinition>>;

    /// Whether this provider belongs to the engine's own API rather than a
    /// user module.
    fn is_core(&self) -> bool;

    /// Functions left out of [`functions`](Self::functions) because their
    /// signature did not decode.
    fn undecoded(&self) -> &[UndecodedFunction] {
        &[]
    }
}
