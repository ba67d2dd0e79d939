//! Type definitions
//!
//! Normalized, immutable views of the engine's type model. Every definition
//! is built from a raw introspection entry and then shared behind an [`Arc`]
//! by the [`TypeRegistry`](super::TypeRegistry).

use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing::debug;

use super::provider::FunctionProvider;
use super::type_ref::{TypeDefError, TypeRef};
use crate::core::naming::{ROOT_OBJECT, cli_name, same_object_name};
use crate::core::string::first_line;
use crate::introspection::{
    RawArgument, RawEnum, RawField, RawFunction, RawInput, RawInterface, RawObject,
};

/// A callable function on an object or interface.
#[derive(Debug, Clone)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub return_type: TypeRef,
    pub args: Vec<ArgumentDefinition>,
    cmd_name: OnceLock<String>,
}

impl FunctionDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            return_type,
            args: Vec::new(),
            cmd_name: OnceLock::new(),
        }
    }

    pub fn with_arg(mut self, arg: ArgumentDefinition) -> Self {
        self.args.push(arg);
        self
    }

    pub fn from_raw(raw: &RawFunction) -> Result<Self, TypeDefError> {
        let mut function = Self::new(
            raw.name.clone(),
            raw.description.clone(),
            TypeRef::from_raw(&raw.return_type)?,
        );
        for arg in &raw.args {
            function.args.push(ArgumentDefinition::from_raw(arg)?);
        }
        Ok(function)
    }

    /// A zero-argument accessor for an object field.
    pub fn from_field(raw: &RawField) -> Result<Self, TypeDefError> {
        Ok(Self::new(
            raw.name.clone(),
            raw.description.clone(),
            TypeRef::from_raw(&raw.type_def)?,
        ))
    }

    pub(crate) fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.cmd_name = OnceLock::new();
    }

    /// Name in the command convention, computed once.
    pub fn cmd_name(&self) -> &str {
        self.cmd_name.get_or_init(|| cli_name(&self.name))
    }

    /// First line of the description.
    pub fn short(&self) -> &str {
        first_line(&self.description)
    }

    /// Looks an argument up by its command-style flag name.
    pub fn get_arg(&self, flag_name: &str) -> Option<&ArgumentDefinition> {
        self.args.iter().find(|a| a.flag_name() == flag_name)
    }

    pub fn required_args(&self) -> impl Iterator<Item = &ArgumentDefinition> {
        self.args.iter().filter(|a| a.is_required())
    }

    pub fn optional_args(&self) -> impl Iterator<Item = &ArgumentDefinition> {
        self.args.iter().filter(|a| !a.is_required())
    }
}

/// An argument to a function.
#[derive(Debug, Clone)]
pub struct ArgumentDefinition {
    pub name: String,
    pub description: String,
    pub type_ref: TypeRef,
    /// Decoded default value; absent when the engine reports none.
    pub default_value: Option<Value>,
    /// Contextual path the engine fills in when the argument is omitted.
    pub default_path: Option<String>,
    flag_name: OnceLock<String>,
}

impl ArgumentDefinition {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            type_ref,
            default_value: None,
            default_path: None,
            flag_name: OnceLock::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_default_path(mut self, path: impl Into<String>) -> Self {
        self.default_path = Some(path.into());
        self
    }

    pub fn from_raw(raw: &RawArgument) -> Result<Self, TypeDefError> {
        let mut arg = Self::new(raw.name.clone(), TypeRef::from_raw(&raw.type_def)?)
            .with_description(raw.description.clone());
        arg.default_value = raw.default_value.as_ref().and_then(decode_default);
        arg.default_path = raw.default_path.clone().filter(|p| !p.is_empty());
        Ok(arg)
    }

    /// Name in the command convention, computed once.
    pub fn flag_name(&self) -> &str {
        self.flag_name.get_or_init(|| cli_name(&self.name))
    }

    /// A caller must supply the argument: it is not nullable and the engine
    /// has nothing to fall back on.
    pub fn is_required(&self) -> bool {
        !self.type_ref.optional && self.default_value.is_none() && self.default_path.is_none()
    }

    /// Default rendered for humans, e.g. `"open"`, `30` or `"./src"`.
    pub fn default_display(&self) -> Option<String> {
        if let Some(path) = &self.default_path {
            return Some(format!("{:?}", path));
        }
        self.default_value.as_ref().map(Value::to_string)
    }

    /// Description with the default appended.
    pub fn long(&self) -> String {
        let mut text = self.description.clone();
        if let Some(default) = self.default_display() {
            if text.contains('\n') {
                text.push_str("\n\n");
            } else if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&format!("(default: {})", default));
        }
        text
    }
}

/// Defaults arrive as JSON text inside a string. An empty string means none.
fn decode_default(raw: &Value) -> Option<Value> {
    match raw {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => {
            Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.clone())))
        }
        other => Some(other.clone()),
    }
}

/// A function or field whose signature did not decode. The rest of its
/// provider stays usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndecodedFunction {
    pub name: String,
    pub error: TypeDefError,
}

fn decode_into(
    provider: &str,
    name: &str,
    decoded: Result<FunctionDefinition, TypeDefError>,
    functions: &mut Vec<Arc<FunctionDefinition>>,
    undecoded: &mut Vec<UndecodedFunction>,
) {
    match decoded {
        Ok(function) => functions.push(Arc::new(function)),
        Err(error) => {
            debug!(provider, function = name, error = %error, "Skipping undecodable function");
            undecoded.push(UndecodedFunction {
                name: name.to_string(),
                error,
            });
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObjectDefinition {
    pub name: String,
    pub description: String,
    pub functions: Vec<Arc<FunctionDefinition>>,
    /// Plain fields, exposed as zero-argument functions.
    pub fields: Vec<Arc<FunctionDefinition>>,
    pub constructor: Option<Arc<FunctionDefinition>>,
    pub source_module_name: String,
    pub undecoded: Vec<UndecodedFunction>,
}

impl ObjectDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            functions: Vec::new(),
            fields: Vec::new(),
            constructor: None,
            source_module_name: String::new(),
            undecoded: Vec::new(),
        }
    }

    pub fn with_function(mut self, function: FunctionDefinition) -> Self {
        self.functions.push(Arc::new(function));
        self
    }

    pub fn with_source_module(mut self, module: impl Into<String>) -> Self {
        self.source_module_name = module.into();
        self
    }

    pub fn from_raw(raw: &RawObject) -> Result<Self, TypeDefError> {
        let mut object = Self::new(raw.name.clone(), raw.description.clone())
            .with_source_module(raw.source_module_name.clone());
        for function in &raw.functions {
            decode_into(
                &raw.name,
                &function.name,
                FunctionDefinition::from_raw(function),
                &mut object.functions,
                &mut object.undecoded,
            );
        }
        for field in &raw.fields {
            decode_into(
                &raw.name,
                &field.name,
                FunctionDefinition::from_field(field),
                &mut object.fields,
                &mut object.undecoded,
            );
        }
        // A constructor is required to select the object at all.
        if let Some(constructor) = &raw.constructor {
            object.constructor = Some(Arc::new(FunctionDefinition::from_raw(constructor)?));
        }
        Ok(object)
    }

    pub fn is_root(&self) -> bool {
        same_object_name(&self.name, ROOT_OBJECT)
    }

    /// Matches declared functions only, by schema name.
    pub fn has_function(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f.name == name)
    }
}

impl FunctionProvider for ObjectDefinition {
    fn provider_name(&self) -> &str {
        &self.name
    }

    fn functions(&self) -> Vec<Arc<FunctionDefinition>> {
        self.fields.iter().chain(self.functions.iter()).cloned().collect()
    }

    fn is_core(&self) -> bool {
        self.source_module_name.is_empty()
    }

    fn undecoded(&self) -> &[UndecodedFunction] {
        &self.undecoded
    }
}

#[derive(Debug, Clone)]
pub struct InterfaceDefinition {
    pub name: String,
    pub description: String,
    pub functions: Vec<Arc<FunctionDefinition>>,
    pub source_module_name: String,
    pub undecoded: Vec<UndecodedFunction>,
}

impl InterfaceDefinition {
    pub fn from_raw(raw: &RawInterface) -> Self {
        let mut functions = Vec::new();
        let mut undecoded = Vec::new();
        for function in &raw.functions {
            decode_into(
                &raw.name,
                &function.name,
                FunctionDefinition::from_raw(function),
                &mut functions,
                &mut undecoded,
            );
        }
        Self {
            name: raw.name.clone(),
            description: raw.description.clone(),
            functions,
            source_module_name: raw.source_module_name.clone(),
            undecoded,
        }
    }
}

impl FunctionProvider for InterfaceDefinition {
    fn provider_name(&self) -> &str {
        &self.name
    }

    fn functions(&self) -> Vec<Arc<FunctionDefinition>> {
        self.functions.clone()
    }

    fn is_core(&self) -> bool {
        self.source_module_name.is_empty()
    }

    fn undecoded(&self) -> &[UndecodedFunction] {
        &self.undecoded
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct EnumDefinition {
    pub name: String,
    pub description: String,
    pub values: Vec<EnumValue>,
}

impl EnumDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            values: Vec::new(),
        }
    }

    pub fn from_raw(raw: &RawEnum) -> Self {
        Self {
            name: raw.name.clone(),
            description: raw.description.clone(),
            values: raw
                .values
                .iter()
                .map(|v| EnumValue {
                    name: v.name.clone(),
                    description: v.description.clone(),
                })
                .collect(),
        }
    }

    pub fn value_names(&self) -> Vec<&str> {
        self.values.iter().map(|v| v.name.as_str()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct InputFieldDefinition {
    pub name: String,
    pub description: String,
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone)]
pub struct InputDefinition {
    pub name: String,
    pub description: String,
    pub fields: Vec<InputFieldDefinition>,
}

impl InputDefinition {
    pub fn from_raw(raw: &RawInput) -> Result<Self, TypeDefError> {
        let fields = raw
            .fields
            .iter()
            .map(|f| {
                Ok(InputFieldDefinition {
                    name: f.name.clone(),
                    description: f.description.clone(),
                    type_ref: TypeRef::from_raw(&f.type_def)?,
                })
            })
            .collect::<Result<Vec<_>, TypeDefError>>()?;
        Ok(Self {
            name: raw.name.clone(),
            description: raw.description.clone(),
            fields,
        })
    }
}
