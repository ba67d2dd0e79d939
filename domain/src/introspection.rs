//! Raw introspection payloads
//!
//! These structs mirror the JSON the engine returns for the type-definition
//! and module-metadata queries. They are deserialized as-is and converted into
//! the normalized [`crate::typedef`] and [`crate::module`] models; nothing
//! outside the conversion code should depend on them.
//!
//! Nested references (a function's return type, an argument's type, a list's
//! element) only ever carry a name. The full definitions are the top-level
//! entries of the type-definition list.

use serde::{Deserialize, Deserializer};

use crate::typedef::TypeKind;

/// Treats `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTypeDef {
    pub kind: TypeKind,
    #[serde(default, deserialize_with = "nullable")]
    pub optional: bool,
    #[serde(default)]
    pub as_object: Option<RawObject>,
    #[serde(default)]
    pub as_interface: Option<RawInterface>,
    #[serde(default)]
    pub as_input: Option<RawInput>,
    #[serde(default)]
    pub as_list: Option<Box<RawList>>,
    #[serde(default)]
    pub as_scalar: Option<RawScalar>,
    #[serde(default)]
    pub as_enum: Option<RawEnum>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObject {
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub functions: Vec<RawFunction>,
    #[serde(default, deserialize_with = "nullable")]
    pub fields: Vec<RawField>,
    #[serde(default)]
    pub constructor: Option<Box<RawFunction>>,
    #[serde(default, deserialize_with = "nullable")]
    pub source_module_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInterface {
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub functions: Vec<RawFunction>,
    #[serde(default, deserialize_with = "nullable")]
    pub source_module_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInput {
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub fields: Vec<RawField>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawList {
    pub element_type_def: RawTypeDef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScalar {
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnum {
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable", alias = "members")]
    pub values: Vec<RawEnumValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnumValue {
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFunction {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    pub return_type: RawTypeDef,
    #[serde(default, deserialize_with = "nullable")]
    pub args: Vec<RawArgument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArgument {
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    pub type_def: RawTypeDef,
    /// JSON-encoded default, usually delivered as a string holding JSON text.
    #[serde(default)]
    pub default_value: Option<serde_json::Value>,
    #[serde(default)]
    pub default_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawField {
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    pub type_def: RawTypeDef,
}

/// Result of the module-metadata query, rooted at the module source.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModuleSource {
    #[serde(default, deserialize_with = "nullable")]
    pub as_string: String,
    #[serde(rename = "asModule")]
    pub module: RawModule,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModule {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    /// The description is only known once the module is initialized.
    #[serde(default, deserialize_with = "nullable")]
    pub initialize: RawInitializedModule,
    #[serde(default, deserialize_with = "nullable")]
    pub dependencies: Vec<RawDependency>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInitializedModule {
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDependency {
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    pub source: RawDependencySource,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDependencySource {
    #[serde(default, deserialize_with = "nullable")]
    pub as_string: String,
    #[serde(default, deserialize_with = "nullable")]
    pub pin: String,
}
