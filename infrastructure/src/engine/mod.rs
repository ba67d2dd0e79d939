//! Engine adapter
//!
//! Connects to the engine's GraphQL endpoint for the current session.

mod client;
mod error;
mod settings;

pub use client::EngineClient;
pub use error::EngineError;
pub use settings::{EngineSettings, SESSION_PORT_VAR, SESSION_TOKEN_VAR};
