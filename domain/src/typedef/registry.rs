//! Type registry
//!
//! Holds every named definition of a loaded module, indexed by its normalized
//! object name so that references written in any casing find their target.
//! Resolution binds shallow [`Link`](super::Link)s to the registry's shared
//! definitions. It only ever walks one level at a time, so self-referencing
//! types cannot cause unbounded recursion.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use super::definitions::{
    EnumDefinition, FunctionDefinition, InputDefinition, InterfaceDefinition, ObjectDefinition,
};
use super::type_ref::{TypeRef, TypeShape};
use crate::core::naming::gql_object_name;

/// Definitions of one kind, in introspection order. First wins on a name
/// collision.
#[derive(Debug, Clone)]
struct Catalog<T> {
    items: Vec<Arc<T>>,
    index: HashMap<String, usize>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Catalog<T> {
    fn insert(&mut self, name: &str, item: Arc<T>) -> bool {
        let key = gql_object_name(name);
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.items.len());
        self.items.push(item);
        true
    }

    fn get(&self, name: &str) -> Option<&Arc<T>> {
        self.index
            .get(&gql_object_name(name))
            .and_then(|&i| self.items.get(i))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    objects: Catalog<ObjectDefinition>,
    interfaces: Catalog<InterfaceDefinition>,
    enums: Catalog<EnumDefinition>,
    inputs: Catalog<InputDefinition>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if an object with the same normalized name exists.
    pub fn insert_object(&mut self, object: Arc<ObjectDefinition>) -> bool {
        let name = object.name.clone();
        self.objects.insert(&name, object)
    }

    pub fn insert_interface(&mut self, interface: Arc<InterfaceDefinition>) -> bool {
        let name = interface.name.clone();
        self.interfaces.insert(&name, interface)
    }

    pub fn insert_enum(&mut self, definition: Arc<EnumDefinition>) -> bool {
        let name = definition.name.clone();
        self.enums.insert(&name, definition)
    }

    pub fn insert_input(&mut self, input: Arc<InputDefinition>) -> bool {
        let name = input.name.clone();
        self.inputs.insert(&name, input)
    }

    pub fn object(&self, name: &str) -> Option<&Arc<ObjectDefinition>> {
        self.objects.get(name)
    }

    pub fn interface(&self, name: &str) -> Option<&Arc<InterfaceDefinition>> {
        self.interfaces.get(name)
    }

    pub fn enumeration(&self, name: &str) -> Option<&Arc<EnumDefinition>> {
        self.enums.get(name)
    }

    pub fn input(&self, name: &str) -> Option<&Arc<InputDefinition>> {
        self.inputs.get(name)
    }

    pub fn objects(&self) -> impl Iterator<Item = &Arc<ObjectDefinition>> {
        self.objects.items.iter()
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &Arc<InterfaceDefinition>> {
        self.interfaces.items.iter()
    }

    /// Binds a shallow reference to its full definition.
    ///
    /// References to names the registry does not know stay shallow. Lists
    /// resolve their element.
    pub fn resolve(&self, type_ref: &TypeRef) {
        match &type_ref.shape {
            TypeShape::Object(link) if !link.is_resolved() => {
                if let Some(object) = self.object(link.name()) {
                    link.bind(object);
                } else {
                    trace!(name = link.name(), "Object reference left unresolved");
                }
            }
            TypeShape::Interface(link) if !link.is_resolved() => {
                if let Some(interface) = self.interface(link.name()) {
                    link.bind(interface);
                }
            }
            TypeShape::Enum(link) if !link.is_resolved() => {
                if let Some(definition) = self.enumeration(link.name()) {
                    link.bind(definition);
                }
            }
            TypeShape::Input(link) if !link.is_resolved() => {
                if let Some(input) = self.input(link.name()) {
                    link.bind(input);
                }
            }
            TypeShape::List(element) => self.resolve(element),
            _ => {}
        }
    }

    /// Resolves a function's return type and every argument type.
    pub fn resolve_function(&self, function: &FunctionDefinition) {
        self.resolve(&function.return_type);
        for arg in &function.args {
            self.resolve(&arg.type_ref);
        }
    }
}
