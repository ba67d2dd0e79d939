//! Tool domain entities

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::typedef::{TypeRef, TypeShape};

/// JSON-schema primitive a tool parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Integer,
    Boolean,
}

impl PrimitiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Boolean => "boolean",
        }
    }

    fn from_type_ref(type_ref: &TypeRef) -> Option<Self> {
        match type_ref.shape {
            TypeShape::String => Some(PrimitiveType::String),
            TypeShape::Integer => Some(PrimitiveType::Integer),
            TypeShape::Boolean => Some(PrimitiveType::Boolean),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Type of a tool parameter: a primitive or a flat list of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "items", rename_all = "lowercase")]
pub enum ParamType {
    Primitive(PrimitiveType),
    Array(PrimitiveType),
}

impl ParamType {
    /// Maps an argument type, or `None` when it cannot be expressed as JSON.
    pub fn from_type_ref(type_ref: &TypeRef) -> Option<Self> {
        match &type_ref.shape {
            TypeShape::List(element) => PrimitiveType::from_type_ref(element).map(ParamType::Array),
            _ => PrimitiveType::from_type_ref(type_ref).map(ParamType::Primitive),
        }
    }

    /// JSON-schema `type` keyword.
    pub fn json_type(&self) -> &'static str {
        match self {
            ParamType::Primitive(p) => p.as_str(),
            ParamType::Array(_) => "array",
        }
    }

    /// Element type of an array parameter.
    pub fn items(&self) -> Option<PrimitiveType> {
        match self {
            ParamType::Array(p) => Some(*p),
            ParamType::Primitive(_) => None,
        }
    }
}

/// Definition of a tool exposed to a language model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "github_issue-list")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Parameter specifications, in declaration order
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name, as the schema spells it
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    pub param_type: ParamType,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &ToolParameter> {
        self.parameters.iter().filter(|p| p.required)
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: ParamType::Primitive(PrimitiveType::String),
        }
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolCallError {
    #[error("arguments for {tool} are not valid JSON: {message}")]
    InvalidJson { tool: String, message: String },

    #[error("arguments for {tool} must be a JSON object, got {found}")]
    NotAnObject { tool: String, found: &'static str },
}

/// A call to a tool with arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments keyed by parameter name
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: Map::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Parses the raw argument text a model produced.
    ///
    /// Blank text means no arguments. Anything else must be a JSON object.
    pub fn parse(tool_name: impl Into<String>, raw_arguments: &str) -> Result<Self, ToolCallError> {
        let tool_name = tool_name.into();
        if raw_arguments.trim().is_empty() {
            return Ok(Self::new(tool_name));
        }
        let value: Value =
            serde_json::from_str(raw_arguments).map_err(|e| ToolCallError::InvalidJson {
                tool: tool_name.clone(),
                message: e.to_string(),
            })?;
        match value {
            Value::Object(arguments) => Ok(Self {
                tool_name,
                arguments,
            }),
            other => Err(ToolCallError::NotAnObject {
                tool: tool_name,
                found: json_kind(&other),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.arguments.get(key)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
