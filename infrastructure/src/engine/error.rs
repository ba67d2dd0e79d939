//! Error types for the engine adapter

use thiserror::Error;

/// Errors that can occur while setting up the engine connection
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No engine session: set DAGGER_SESSION_PORT or [engine].port / [engine].endpoint")]
    MissingEndpoint,

    #[error("No engine session token: set DAGGER_SESSION_TOKEN")]
    MissingToken,

    #[error("Invalid engine session port {0:?}")]
    InvalidPort(String),

    #[error("Invalid engine endpoint {endpoint:?}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
