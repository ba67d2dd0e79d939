//! Function-calling tool converter.
//!
//! [`ToolSchemaPort`] implementation producing the OpenAI-style
//! function-calling shape:
//!
//! ```json
//! {"type": "function", "function": {"name": "...", "description": "...", "parameters": {...}}}
//! ```
//!
//! Parameter types map one to one: `string`, `integer`, `boolean`, and
//! `array` with primitive `items`.

use langbridge_application::ToolSchemaPort;
use langbridge_domain::{ToolDefinition, ToolParameter};
use serde_json::{Map, Value, json};

pub struct FunctionCallingConverter;

fn property(param: &ToolParameter) -> Value {
    let mut prop = Map::new();
    prop.insert("type".to_string(), json!(param.param_type.json_type()));
    if let Some(items) = param.param_type.items() {
        prop.insert("items".to_string(), json!({ "type": items.as_str() }));
    }
    prop.insert("description".to_string(), json!(param.description));
    Value::Object(prop)
}

impl ToolSchemaPort for FunctionCallingConverter {
    fn protocol(&self) -> &'static str {
        "openai"
    }

    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            properties.insert(param.name.clone(), property(param));
            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }
            }
        })
    }
}
