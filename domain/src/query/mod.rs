//! Query construction

pub mod builder;

pub use builder::{QueryBuildError, QueryBuilder};
