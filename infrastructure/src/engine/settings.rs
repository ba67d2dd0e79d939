//! Engine connection settings
//!
//! The endpoint comes from `[engine].endpoint` when set, otherwise from the
//! local session port (`[engine].port`, then `DAGGER_SESSION_PORT`). The
//! session token is only ever read from `DAGGER_SESSION_TOKEN`.

use super::error::EngineError;
use crate::config::FileEngineConfig;
use langbridge_application::EnvironmentPort;
use secrecy::SecretString;

/// Environment variable holding the local session port.
pub const SESSION_PORT_VAR: &str = "DAGGER_SESSION_PORT";

/// Environment variable holding the session token.
pub const SESSION_TOKEN_VAR: &str = "DAGGER_SESSION_TOKEN";

#[derive(Debug)]
pub struct EngineSettings {
    pub endpoint: String,
    pub token: SecretString,
}

impl EngineSettings {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: SecretString::from(token.into()),
        }
    }

    pub fn resolve(
        config: &FileEngineConfig,
        env: &dyn EnvironmentPort,
    ) -> Result<Self, EngineError> {
        let endpoint = match (&config.endpoint, config.port) {
            (Some(endpoint), _) => endpoint.clone(),
            (None, Some(port)) => local_endpoint(port),
            (None, None) => {
                let raw = env
                    .var(SESSION_PORT_VAR)
                    .filter(|v| !v.is_empty())
                    .ok_or(EngineError::MissingEndpoint)?;
                let port = raw
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| EngineError::InvalidPort(raw.clone()))?;
                local_endpoint(port)
            }
        };

        let token = env
            .var(SESSION_TOKEN_VAR)
            .filter(|v| !v.is_empty())
            .ok_or(EngineError::MissingToken)?;

        Ok(Self {
            endpoint,
            token: SecretString::from(token),
        })
    }
}

fn local_endpoint(port: u16) -> String {
    format!("http://127.0.0.1:{port}/query")
}
