//! Type model
//!
//! Objects, interfaces, functions, arguments, enums, inputs and scalars as
//! reported by schema introspection, plus the registry that links references
//! between them.

pub mod definitions;
pub mod provider;
pub mod registry;
pub mod type_ref;

pub use definitions::{
    ArgumentDefinition, EnumDefinition, EnumValue, FunctionDefinition, InputDefinition,
    InputFieldDefinition, InterfaceDefinition, ObjectDefinition, UndecodedFunction,
};
pub use provider::FunctionProvider;
pub use registry::TypeRegistry;
pub use type_ref::{Link, ScalarDefinition, TypeDefError, TypeKind, TypeRef, TypeShape};
