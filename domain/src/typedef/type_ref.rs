//! Type references
//!
//! A [`TypeRef`] is how a function's return type or an argument's type points
//! at the type model. Primitive shapes are self-contained. Named shapes hold a
//! [`Link`] that starts out knowing only the target's name and is later bound
//! to the full definition by the [`TypeRegistry`](super::TypeRegistry).
//!
//! Links hold a weak pointer so that self-referencing types (an object whose
//! function returns the same object) do not keep each other alive.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::definitions::{EnumDefinition, InputDefinition, InterfaceDefinition, ObjectDefinition};
use super::provider::FunctionProvider;
use crate::introspection::RawTypeDef;

/// The closed set of type kinds the engine reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    #[serde(rename = "STRING_KIND")]
    String,
    #[serde(rename = "INTEGER_KIND")]
    Integer,
    #[serde(rename = "BOOLEAN_KIND")]
    Boolean,
    #[serde(rename = "VOID_KIND")]
    Void,
    #[serde(rename = "SCALAR_KIND")]
    Scalar,
    #[serde(rename = "ENUM_KIND")]
    Enum,
    #[serde(rename = "INPUT_KIND")]
    Input,
    #[serde(rename = "OBJECT_KIND")]
    Object,
    #[serde(rename = "INTERFACE_KIND")]
    Interface,
    #[serde(rename = "LIST_KIND")]
    List,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::String => "STRING_KIND",
            TypeKind::Integer => "INTEGER_KIND",
            TypeKind::Boolean => "BOOLEAN_KIND",
            TypeKind::Void => "VOID_KIND",
            TypeKind::Scalar => "SCALAR_KIND",
            TypeKind::Enum => "ENUM_KIND",
            TypeKind::Input => "INPUT_KIND",
            TypeKind::Object => "OBJECT_KIND",
            TypeKind::Interface => "INTERFACE_KIND",
            TypeKind::List => "LIST_KIND",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A type definition that does not match its declared kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeDefError {
    #[error("type definition of kind {kind} carries no {kind} payload")]
    MissingPayload { kind: TypeKind },
}

/// Named reference to a definition, bound at most once.
pub struct Link<T> {
    name: String,
    target: OnceLock<Weak<T>>,
}

impl<T> Link<T> {
    /// A reference that only knows the target's name.
    pub fn shallow(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full definition, if bound and still alive.
    pub fn get(&self) -> Option<Arc<T>> {
        self.target.get().and_then(Weak::upgrade)
    }

    pub fn is_resolved(&self) -> bool {
        self.get().is_some()
    }

    /// Binds the link. Later calls are no-ops.
    pub(crate) fn bind(&self, target: &Arc<T>) {
        let _ = self.target.set(Arc::downgrade(target));
    }
}

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        let target = OnceLock::new();
        if let Some(weak) = self.target.get() {
            let _ = target.set(weak.clone());
        }
        Self {
            name: self.name.clone(),
            target,
        }
    }
}

impl<T> fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("name", &self.name)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// Custom scalar, carried inline since it has no members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarDefinition {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub enum TypeShape {
    String,
    Integer,
    Boolean,
    Void,
    Scalar(ScalarDefinition),
    Enum(Link<EnumDefinition>),
    Input(Link<InputDefinition>),
    Object(Link<ObjectDefinition>),
    Interface(Link<InterfaceDefinition>),
    List(Box<TypeRef>),
}

/// A reference to a type, plus whether a null value is acceptable.
#[derive(Debug, Clone)]
pub struct TypeRef {
    pub optional: bool,
    pub shape: TypeShape,
}

impl TypeRef {
    pub fn new(shape: TypeShape) -> Self {
        Self {
            optional: false,
            shape,
        }
    }

    pub fn string() -> Self {
        Self::new(TypeShape::String)
    }

    pub fn integer() -> Self {
        Self::new(TypeShape::Integer)
    }

    pub fn boolean() -> Self {
        Self::new(TypeShape::Boolean)
    }

    pub fn void() -> Self {
        Self::new(TypeShape::Void)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(TypeShape::Object(Link::shallow(name)))
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(TypeShape::Interface(Link::shallow(name)))
    }

    pub fn input(name: impl Into<String>) -> Self {
        Self::new(TypeShape::Input(Link::shallow(name)))
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(TypeShape::Enum(Link::shallow(name)))
    }

    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(TypeShape::Scalar(ScalarDefinition {
            name: name.into(),
            description: String::new(),
        }))
    }

    pub fn list(element: TypeRef) -> Self {
        Self::new(TypeShape::List(Box::new(element)))
    }

    pub fn into_optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn kind(&self) -> TypeKind {
        match &self.shape {
            TypeShape::String => TypeKind::String,
            TypeShape::Integer => TypeKind::Integer,
            TypeShape::Boolean => TypeKind::Boolean,
            TypeShape::Void => TypeKind::Void,
            TypeShape::Scalar(_) => TypeKind::Scalar,
            TypeShape::Enum(_) => TypeKind::Enum,
            TypeShape::Input(_) => TypeKind::Input,
            TypeShape::Object(_) => TypeKind::Object,
            TypeShape::Interface(_) => TypeKind::Interface,
            TypeShape::List(_) => TypeKind::List,
        }
    }

    /// Element type when this is a list.
    pub fn element(&self) -> Option<&TypeRef> {
        match &self.shape {
            TypeShape::List(element) => Some(element),
            _ => None,
        }
    }

    /// Name of the referenced object, if this is an object reference.
    pub fn object_name(&self) -> Option<&str> {
        match &self.shape {
            TypeShape::Object(link) => Some(link.name()),
            _ => None,
        }
    }

    /// Name of the referenced scalar, if this is a custom scalar.
    pub fn scalar_name(&self) -> Option<&str> {
        match &self.shape {
            TypeShape::Scalar(scalar) => Some(&scalar.name),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<Arc<ObjectDefinition>> {
        match &self.shape {
            TypeShape::Object(link) => link.get(),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<Arc<InterfaceDefinition>> {
        match &self.shape {
            TypeShape::Interface(link) => link.get(),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<Arc<EnumDefinition>> {
        match &self.shape {
            TypeShape::Enum(link) => link.get(),
            _ => None,
        }
    }

    pub fn as_input(&self) -> Option<Arc<InputDefinition>> {
        match &self.shape {
            TypeShape::Input(link) => link.get(),
            _ => None,
        }
    }

    /// Resolved object or interface, looking through one level of list.
    pub fn as_function_provider(&self) -> Option<Arc<dyn FunctionProvider>> {
        match &self.shape {
            TypeShape::Object(link) => link.get().map(|o| o as Arc<dyn FunctionProvider>),
            TypeShape::Interface(link) => link.get().map(|i| i as Arc<dyn FunctionProvider>),
            TypeShape::List(element) => match &element.shape {
                TypeShape::List(_) => None,
                _ => element.as_function_provider(),
            },
            _ => None,
        }
    }

    /// Whether the value has members that must be sub-selected in a query.
    pub fn is_composite(&self) -> bool {
        match &self.shape {
            TypeShape::Object(_) | TypeShape::Interface(_) => true,
            TypeShape::List(element) => element.is_composite(),
            _ => false,
        }
    }

    /// True when every named reference reachable without recursion is bound.
    pub fn is_resolved(&self) -> bool {
        match &self.shape {
            TypeShape::Enum(link) => link.is_resolved(),
            TypeShape::Input(link) => link.is_resolved(),
            TypeShape::Object(link) => link.is_resolved(),
            TypeShape::Interface(link) => link.is_resolved(),
            TypeShape::List(element) => element.is_resolved(),
            _ => true,
        }
    }

    /// Description of the referenced definition, empty when unknown.
    pub fn description(&self) -> String {
        match &self.shape {
            TypeShape::String | TypeShape::Integer | TypeShape::Boolean | TypeShape::Void => {
                "Primitive type.".to_string()
            }
            TypeShape::Scalar(scalar) => scalar.description.clone(),
            TypeShape::Enum(link) => link.get().map(|d| d.description.clone()).unwrap_or_default(),
            TypeShape::Input(link) => link.get().map(|d| d.description.clone()).unwrap_or_default(),
            TypeShape::Object(link) => link.get().map(|d| d.description.clone()).unwrap_or_default(),
            TypeShape::Interface(link) => {
                link.get().map(|d| d.description.clone()).unwrap_or_default()
            }
            TypeShape::List(element) => element.description(),
        }
    }

    /// Converts a raw introspection entry into a (possibly shallow) reference.
    pub fn from_raw(raw: &RawTypeDef) -> Result<Self, TypeDefError> {
        let missing = || TypeDefError::MissingPayload { kind: raw.kind };
        let shape = match raw.kind {
            TypeKind::String => TypeShape::String,
            TypeKind::Integer => TypeShape::Integer,
            TypeKind::Boolean => TypeShape::Boolean,
            TypeKind::Void => TypeShape::Void,
            TypeKind::Scalar => {
                let scalar = raw.as_scalar.as_ref().ok_or_else(missing)?;
                TypeShape::Scalar(ScalarDefinition {
                    name: scalar.name.clone(),
                    description: scalar.description.clone(),
                })
            }
            TypeKind::Enum => {
                let name = &raw.as_enum.as_ref().ok_or_else(missing)?.name;
                TypeShape::Enum(Link::shallow(name.clone()))
            }
            TypeKind::Input => {
                let name = &raw.as_input.as_ref().ok_or_else(missing)?.name;
                TypeShape::Input(Link::shallow(name.clone()))
            }
            TypeKind::Object => {
                let name = &raw.as_object.as_ref().ok_or_else(missing)?.name;
                TypeShape::Object(Link::shallow(name.clone()))
            }
            TypeKind::Interface => {
                let name = &raw.as_interface.as_ref().ok_or_else(missing)?.name;
                TypeShape::Interface(Link::shallow(name.clone()))
            }
            TypeKind::List => {
                let list = raw.as_list.as_ref().ok_or_else(missing)?;
                TypeShape::List(Box::new(TypeRef::from_raw(&list.element_type_def)?))
            }
        };
        Ok(Self {
            optional: raw.optional,
            shape,
        })
    }
}

/// Short rendering for listings: `string`, `[]Issue`, `Secret`.
impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shape {
            TypeShape::String => write!(f, "string"),
            TypeShape::Integer => write!(f, "int"),
            TypeShape::Boolean => write!(f, "bool"),
            TypeShape::Void => write!(f, "void"),
            TypeShape::Scalar(scalar) => write!(f, "{}", scalar.name),
            TypeShape::Enum(link) => write!(f, "{}", link.name()),
            TypeShape::Input(link) => write!(f, "{}", link.name()),
            TypeShape::Object(link) => write!(f, "{}", link.name()),
            TypeShape::Interface(link) => write!(f, "{}", link.name()),
            TypeShape::List(element) => write!(f, "[]{}", element),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(value: serde_json::Value) -> RawTypeDef {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_raw_primitives() {
        let t = TypeRef::from_raw(&raw(serde_json::json!({
            "kind": "STRING_KIND",
            "optional": true
        })))
        .unwrap();
        assert_eq!(t.kind(), TypeKind::String);
        assert!(t.optional);
        assert!(t.is_resolved());
        assert_eq!(t.to_string(), "string");
        assert_eq!(t.description(), "Primitive type.");
    }

    #[test]
    fn test_from_raw_list_of_objects_is_shallow() {
        let t = TypeRef::from_raw(&raw(serde_json::json!({
            "kind": "LIST_KIND",
            "asList": {
                "elementTypeDef": { "kind": "OBJECT_KIND", "asObject": { "name": "Issue" } }
            }
        })))
        .unwrap();

        assert_eq!(t.kind(), TypeKind::List);
        assert_eq!(t.element().unwrap().object_name(), Some("Issue"));
        assert!(!t.is_resolved());
        assert!(t.is_composite());
        assert_eq!(t.to_string(), "[]Issue");
    }

    #[test]
    fn test_from_raw_missing_payload() {
        let err = TypeRef::from_raw(&raw(serde_json::json!({ "kind": "OBJECT_KIND" })))
            .unwrap_err();
        assert_eq!(
            err,
            TypeDefError::MissingPayload {
                kind: TypeKind::Object
            }
        );
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<RawTypeDef, _> =
            serde_json::from_value(serde_json::json!({ "kind": "TUPLE_KIND" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_link_binds_once() {
        let first = Arc::new(EnumDefinition::new("State", "first"));
        let second = Arc::new(EnumDefinition::new("State", "second"));
        let link: Link<EnumDefinition> = Link::shallow("State");
        assert!(!link.is_resolved());

        link.bind(&first);
        link.bind(&second);
        assert_eq!(link.get().unwrap().description, "first");

        let cloned = link.clone();
        assert!(cloned.is_resolved());
    }

    #[test]
    fn test_link_does_not_keep_target_alive() {
        let link: Link<EnumDefinition> = Link::shallow("State");
        {
            let target = Arc::new(EnumDefinition::new("State", ""));
            link.bind(&target);
            assert!(link.is_resolved());
        }
        assert!(!link.is_resolved());
    }
}
