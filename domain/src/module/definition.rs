//! Module definition
//!
//! A loaded module: its metadata, its dependencies, the full type registry
//! and the main object whose functions become tools.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::source::ModuleSourceRef;
use crate::core::naming::{ROOT_OBJECT, gql_field_name, gql_object_name, same_object_name};
use crate::core::string::first_line;
use crate::introspection::{RawModuleSource, RawTypeDef};
use crate::typedef::{
    EnumDefinition, FunctionDefinition, FunctionProvider, InputDefinition, InterfaceDefinition,
    ObjectDefinition, TypeDefError, TypeKind, TypeRef, TypeRegistry,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModuleError {
    #[error(
        "main object not found for module {module:?}: expected an object named {expected}; \
         check that the module name matches its main object"
    )]
    MainObjectNotFound { module: String, expected: String },

    #[error("invalid type definition in module {module:?}: {source}")]
    InvalidTypeDef {
        module: String,
        #[source]
        source: TypeDefError,
    },

    #[error("function {function:?} not found on {provider}")]
    FunctionNotFound { function: String, provider: String },
}

/// A dependency declared by a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDependency {
    pub name: String,
    pub description: String,
    pub source: ModuleSourceRef,
}

impl ModuleDependency {
    pub fn short(&self) -> &str {
        first_line(&self.description)
    }
}

/// Name, description and dependencies of a module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleMetadata {
    pub name: String,
    pub description: String,
    /// Canonical reference the engine reports for the source.
    pub mod_ref: String,
    pub dependencies: Vec<ModuleDependency>,
}

impl From<RawModuleSource> for ModuleMetadata {
    fn from(raw: RawModuleSource) -> Self {
        Self {
            name: raw.module.name,
            description: raw.module.initialize.description,
            mod_ref: raw.as_string,
            dependencies: raw
                .module
                .dependencies
                .into_iter()
                .map(|d| ModuleDependency {
                    name: d.name,
                    description: d.description,
                    source: ModuleSourceRef::new(d.source.as_string).with_pin(d.source.pin),
                })
                .collect(),
        }
    }
}

#[derive(Debug)]
pub struct ModuleDefinition {
    pub name: String,
    pub description: String,
    pub mod_ref: String,
    pub source: ModuleSourceRef,
    pub dependencies: Vec<ModuleDependency>,
    main_object: Arc<ObjectDefinition>,
    constructor: Arc<FunctionDefinition>,
    types: TypeRegistry,
}

impl ModuleDefinition {
    /// Builds a module from its metadata and the engine's type definitions.
    ///
    /// The main object is the one whose normalized name matches the module's
    /// name, or the root object for an unnamed module. Objects without a
    /// constructor get a synthesized zero-argument one, and the main
    /// constructor is exposed on the root object when the schema lacks it.
    pub fn assemble(
        metadata: ModuleMetadata,
        source: ModuleSourceRef,
        type_defs: &[RawTypeDef],
    ) -> Result<Self, ModuleError> {
        let invalid = |source: TypeDefError| ModuleError::InvalidTypeDef {
            module: metadata.name.clone(),
            source,
        };
        let missing = |kind: TypeKind| invalid(TypeDefError::MissingPayload { kind });

        let mut objects = Vec::new();
        let mut interfaces = Vec::new();
        let mut enums = Vec::new();
        let mut inputs = Vec::new();
        for raw in type_defs {
            match raw.kind {
                TypeKind::Object => {
                    let object = raw.as_object.as_ref().ok_or_else(|| missing(raw.kind))?;
                    objects.push(ObjectDefinition::from_raw(object).map_err(invalid)?);
                }
                TypeKind::Interface => {
                    let interface = raw.as_interface.as_ref().ok_or_else(|| missing(raw.kind))?;
                    interfaces.push(InterfaceDefinition::from_raw(interface));
                }
                TypeKind::Enum => {
                    let definition = raw.as_enum.as_ref().ok_or_else(|| missing(raw.kind))?;
                    enums.push(EnumDefinition::from_raw(definition));
                }
                TypeKind::Input => {
                    let input = raw.as_input.as_ref().ok_or_else(|| missing(raw.kind))?;
                    inputs.push(InputDefinition::from_raw(input).map_err(invalid)?);
                }
                _ => {}
            }
        }

        let named = !metadata.name.is_empty();
        let expected = if named {
            gql_object_name(&metadata.name)
        } else {
            ROOT_OBJECT.to_string()
        };
        let main_index = objects
            .iter()
            .position(|o| gql_object_name(&o.name) == expected)
            .ok_or_else(|| ModuleError::MainObjectNotFound {
                module: metadata.name.clone(),
                expected: expected.clone(),
            })?;

        let mut constructor = None;
        for (i, object) in objects.iter_mut().enumerate() {
            let is_main = i == main_index;
            if object.is_root() && !is_main {
                continue;
            }
            let ctor = ensure_constructor(object);
            if is_main {
                constructor = Some(ctor);
            }
        }
        let constructor = constructor.ok_or_else(|| ModuleError::MainObjectNotFound {
            module: metadata.name.clone(),
            expected: expected.clone(),
        })?;

        if named {
            if let Some(root) = objects.iter_mut().find(|o| o.is_root()) {
                if !root.has_function(&constructor.name) {
                    root.functions.push(constructor.clone());
                }
            }
        }

        let mut types = TypeRegistry::new();
        let objects: Vec<Arc<ObjectDefinition>> = objects.into_iter().map(Arc::new).collect();
        let main_object = objects[main_index].clone();
        for object in objects {
            types.insert_object(object);
        }
        for interface in interfaces {
            types.insert_interface(Arc::new(interface));
        }
        for definition in enums {
            types.insert_enum(Arc::new(definition));
        }
        for input in inputs {
            types.insert_input(Arc::new(input));
        }

        types.resolve_function(&constructor);
        debug!(
            module = %metadata.name,
            main_object = %main_object.name,
            "Assembled module"
        );

        Ok(Self {
            name: metadata.name,
            description: metadata.description,
            mod_ref: metadata.mod_ref,
            source,
            dependencies: metadata.dependencies,
            main_object,
            constructor,
            types,
        })
    }

    /// Whether this is a named user module rather than the bare engine API.
    pub fn has_module(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn main_object(&self) -> &Arc<ObjectDefinition> {
        &self.main_object
    }

    pub fn constructor(&self) -> &Arc<FunctionDefinition> {
        &self.constructor
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn root_object(&self) -> Option<&Arc<ObjectDefinition>> {
        self.types.object(ROOT_OBJECT)
    }

    /// Field that selects the module's main object from the root, if any.
    pub fn constructor_field(&self) -> Option<&str> {
        if self.has_module() && !self.main_object.is_root() {
            Some(&self.constructor.name)
        } else {
            None
        }
    }

    pub fn get_object(&self, name: &str) -> Option<&Arc<ObjectDefinition>> {
        self.types.object(name)
    }

    pub fn load_type_def(&self, type_ref: &TypeRef) {
        self.types.resolve(type_ref);
    }

    pub fn load_function_type_defs(&self, function: &FunctionDefinition) {
        self.types.resolve_function(function);
    }

    /// Finds a function by schema or command name and resolves its types.
    ///
    /// On the root object of a named module the main constructor is also
    /// reachable under its command name.
    pub fn get_function(
        &self,
        provider: &dyn FunctionProvider,
        name: &str,
    ) -> Result<Arc<FunctionDefinition>, ModuleError> {
        if self.has_module()
            && same_object_name(provider.provider_name(), ROOT_OBJECT)
            && self.constructor.cmd_name() == name
        {
            return Ok(self.constructor.clone());
        }
        provider
            .functions()
            .into_iter()
            .find(|f| f.name == name || f.cmd_name() == name)
            .inspect(|f| self.load_function_type_defs(f))
            .ok_or_else(|| ModuleError::FunctionNotFound {
                function: name.to_string(),
                provider: provider.provider_name().to_string(),
            })
    }

    pub fn has_function(&self, provider: &dyn FunctionProvider, name: &str) -> bool {
        self.get_function(provider, name).is_ok()
    }
}

/// Gives an object a constructor, synthesizing one that takes no arguments
/// when the schema reports none. Non-root constructors are named after the
/// field that selects them.
fn ensure_constructor(object: &mut ObjectDefinition) -> Arc<FunctionDefinition> {
    let mut ctor = object.constructor.take().unwrap_or_else(|| {
        Arc::new(FunctionDefinition::new(
            "",
            "",
            TypeRef::object(object.name.clone()),
        ))
    });
    if !object.is_root() {
        Arc::make_mut(&mut ctor).rename(gql_field_name(&object.name));
    }
    object.constructor = Some(ctor.clone());
    ctor
}
