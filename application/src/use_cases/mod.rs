//! Use cases
//!
//! Application-level operations that orchestrate domain logic. Each one
//! takes its ports explicitly and observes a caller-supplied cancellation
//! token on every remote call.

pub mod dispatch_tool;
pub mod hydrate_constructor;
pub mod load_module;
pub mod load_tools;
pub mod resolve_module;
