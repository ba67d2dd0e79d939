//! Presentation layer for langbridge
//!
//! This crate contains CLI definitions and output formatters.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, SchemaProtocol};
pub use output::console::ConsoleFormatter;
