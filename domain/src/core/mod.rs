//! Core domain utilities shared by every other module.

pub mod naming;
pub mod string;
