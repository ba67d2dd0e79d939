//! Application-level configuration.
//!
//! - [`LoadOptions`]: module resolution and hydration switches

pub mod load_options;

pub use load_options::LoadOptions;
