//! Engine connection configuration (`[engine]` section)
//!
//! ```toml
//! [engine]
//! endpoint = "http://127.0.0.1:41234/query"
//! # or only the local session port
//! port = 41234
//! ```
//!
//! Both are optional; without them the session port is read from
//! `DAGGER_SESSION_PORT`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEngineConfig {
    /// Full GraphQL endpoint URL
    pub endpoint: Option<String>,
    /// Local session port, used when no endpoint is set
    pub port: Option<u16>,
}
