//! MCP tool converter.
//!
//! Builds MCP tool descriptors (`{name, description, inputSchema}`) through a
//! small property-builder API, then exposes it as a [`ToolSchemaPort`].
//! MCP has no integer type, so integer parameters become `number`.

use langbridge_application::ToolSchemaPort;
use langbridge_domain::{ParamType, PrimitiveType, ToolDefinition};
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Modifier applied to one property of a tool's input schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyOption {
    Description(String),
    Required,
}

#[derive(Debug, Clone, Serialize)]
pub struct McpInputSchema {
    #[serde(rename = "type")]
    pub schema_type: &'static str,
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// An MCP tool descriptor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    pub name: String,
    pub description: String,
    pub input_schema: McpInputSchema,
}

impl McpTool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            input_schema: McpInputSchema {
                schema_type: "object",
                properties: Map::new(),
                required: Vec::new(),
            },
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_string(
        self,
        name: impl Into<String>,
        options: impl IntoIterator<Item = PropertyOption>,
    ) -> Self {
        self.with_property(name, json!({ "type": "string" }), options)
    }

    pub fn with_number(
        self,
        name: impl Into<String>,
        options: impl IntoIterator<Item = PropertyOption>,
    ) -> Self {
        self.with_property(name, json!({ "type": "number" }), options)
    }

    pub fn with_boolean(
        self,
        name: impl Into<String>,
        options: impl IntoIterator<Item = PropertyOption>,
    ) -> Self {
        self.with_property(name, json!({ "type": "boolean" }), options)
    }

    /// Array property whose elements have the JSON type `items`.
    pub fn with_array(
        self,
        name: impl Into<String>,
        items: &str,
        options: impl IntoIterator<Item = PropertyOption>,
    ) -> Self {
        self.with_property(
            name,
            json!({ "type": "array", "items": { "type": items } }),
            options,
        )
    }

    fn with_property(
        mut self,
        name: impl Into<String>,
        mut schema: Value,
        options: impl IntoIterator<Item = PropertyOption>,
    ) -> Self {
        let name = name.into();
        for option in options {
            match option {
                PropertyOption::Description(description) => {
                    schema["description"] = Value::String(description);
                }
                PropertyOption::Required => {
                    if !self.input_schema.required.contains(&name) {
                        self.input_schema.required.push(name.clone());
                    }
                }
            }
        }
        self.input_schema.properties.insert(name, schema);
        self
    }

    pub fn to_json(&self) -> Value {
        let mut input_schema = json!({
            "type": self.input_schema.schema_type,
            "properties": self.input_schema.properties,
        });
        if !self.input_schema.required.is_empty() {
            input_schema["required"] = json!(self.input_schema.required);
        }
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": input_schema,
        })
    }
}

fn mcp_type(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::String => "string",
        PrimitiveType::Integer => "number",
        PrimitiveType::Boolean => "boolean",
    }
}

/// Converts tool definitions to MCP tool descriptors.
pub struct McpToolConverter;

impl McpToolConverter {
    pub fn to_mcp_tool(&self, tool: &ToolDefinition) -> McpTool {
        tool.parameters.iter().fold(
            McpTool::new(&tool.name).with_description(&tool.description),
            |mcp, param| {
                let mut options = vec![PropertyOption::Description(param.description.clone())];
                if param.required {
                    options.push(PropertyOption::Required);
                }
                match param.param_type {
                    ParamType::Primitive(PrimitiveType::String) => {
                        mcp.with_string(&param.name, options)
                    }
                    ParamType::Primitive(PrimitiveType::Integer) => {
                        mcp.with_number(&param.name, options)
                    }
                    ParamType::Primitive(PrimitiveType::Boolean) => {
                        mcp.with_boolean(&param.name, options)
                    }
                    ParamType::Array(items) => mcp.with_array(&param.name, mcp_type(items), options),
                }
            },
        )
    }
}

impl ToolSchemaPort for McpToolConverter {
    fn protocol(&self) -> &'static str {
        "mcp"
    }

    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        self.to_mcp_tool(tool).to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use langbridge_domain::ToolParameter;

    #[test]
    fn test_builder() {
        let tool = McpTool::new("github_issue-list")
            .with_description("GitHub API\nList open issues")
            .with_string(
                "repo",
                [
                    PropertyOption::Description("Repository owner/name".to_string()),
                    PropertyOption::Required,
                ],
            )
            .with_number(
                "limit",
                [PropertyOption::Description("Page size".to_string())],
            )
            .with_boolean("draft", [PropertyOption::Required, PropertyOption::Required]);

        assert_eq!(serde_json::to_value(&tool).unwrap(), tool.to_json());

        assert_eq!(
            tool.to_json(),
            json!({
                "name": "github_issue-list",
                "description": "GitHub API\nList open issues",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "repo": { "type": "string", "description": "Repository owner/name" },
                        "limit": { "type": "number", "description": "Page size" },
                        "draft": { "type": "boolean" }
                    },
                    "required": ["repo", "draft"]
                }
            })
        );
    }

    #[test]
    fn test_convert_definition() {
        let definition = ToolDefinition::new("github_issue-list", "GitHub API\nList open issues")
            .with_parameter(ToolParameter::new("repo", "Repository owner/name", true))
            .with_parameter(
                ToolParameter::new("limit", "(default: 30)", false)
                    .with_type(ParamType::Primitive(PrimitiveType::Integer)),
            )
            .with_parameter(
                ToolParameter::new("numbers", "", false)
                    .with_type(ParamType::Array(PrimitiveType::Integer)),
            );

        let schema = McpToolConverter.tool_to_schema(&definition);
        let properties = &schema["inputSchema"]["properties"];
        assert_eq!(properties["repo"]["type"], "string");
        assert_eq!(properties["limit"]["type"], "number");
        assert_eq!(properties["limit"]["description"], "(default: 30)");
        assert_eq!(properties["numbers"]["type"], "array");
        assert_eq!(properties["numbers"]["items"]["type"], "number");
        assert_eq!(schema["inputSchema"]["required"], json!(["repo"]));
    }

    #[test]
    fn test_no_required_parameters() {
        let tool = McpToolConverter.to_mcp_tool(&ToolDefinition::new("github_version", "v"));
        assert_eq!(serde_json::to_value(&tool).unwrap(), tool.to_json());

        let schema = McpToolConverter.tool_to_schema(&ToolDefinition::new("github_version", "v"));
        assert_eq!(
            schema["inputSchema"],
            json!({ "type": "object", "properties": {} })
        );
    }
}
