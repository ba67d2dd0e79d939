//! Module sources
//!
//! A module is addressed by a reference string (a local path or a git URL)
//! and an optional pin. Resolution classifies the reference and, for local
//! sources, locates the configuration directory and context root.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::query::QueryBuilder;

/// How a module reference is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    Git,
    Local,
    /// Any kind this bridge does not know how to load.
    Unsupported(String),
}

impl SourceKind {
    /// Maps the engine's `ModuleSourceKind` enum value.
    pub fn from_engine(kind: &str) -> Self {
        match kind {
            "GIT_SOURCE" => SourceKind::Git,
            "LOCAL_SOURCE" => SourceKind::Local,
            other => SourceKind::Unsupported(other.to_string()),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Git => write!(f, "git"),
            SourceKind::Local => write!(f, "local"),
            SourceKind::Unsupported(kind) => write!(f, "{}", kind),
        }
    }
}

/// Reference to a module source on the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSourceRef {
    pub reference: String,
    pub pin: Option<String>,
    /// Resolve the source relative to the calling client's filesystem.
    pub resolve_from_caller: bool,
}

impl ModuleSourceRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            pin: None,
            resolve_from_caller: false,
        }
    }

    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        let pin = pin.into();
        self.pin = if pin.is_empty() { None } else { Some(pin) };
        self
    }

    pub fn resolving_from_caller(mut self) -> Self {
        self.resolve_from_caller = true;
        self
    }

    /// Selects this source on the query root.
    pub fn select(&self, query: QueryBuilder) -> QueryBuilder {
        let mut query = query
            .select("moduleSource")
            .arg("refString", self.reference.as_str());
        if let Some(pin) = &self.pin {
            query = query.arg("refPin", pin.as_str());
        }
        if self.resolve_from_caller {
            query = query.select("resolveFromCaller");
        }
        query
    }
}

impl fmt::Display for ModuleSourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pin {
            Some(pin) => write!(f, "{} (pin {})", self.reference, pin),
            None => write!(f, "{}", self.reference),
        }
    }
}

/// Outcome of resolving a module reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredModule {
    pub source: ModuleSourceRef,
    pub kind: SourceKind,
    /// Whether the module's configuration file exists at the source.
    pub config_exists: bool,
    /// Directory holding the configuration file, for local sources.
    pub local_root: Option<PathBuf>,
    /// Context directory the engine loads the source from, for local sources.
    pub local_context: Option<PathBuf>,
}

impl ConfiguredModule {
    pub fn remote(source: ModuleSourceRef) -> Self {
        Self {
            source,
            kind: SourceKind::Git,
            config_exists: true,
            local_root: None,
            local_context: None,
        }
    }

    /// A module is fully initialized once its configuration exists.
    pub fn fully_initialized(&self) -> bool {
        self.config_exists
    }
}
