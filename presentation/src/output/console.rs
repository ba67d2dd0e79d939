//! Console output formatter for tools and call results

use colored::Colorize;
use langbridge_application::ToolSet;
use langbridge_domain::ToolParameter;
use serde_json::Value;

/// Formats tool listings, schemas and call results for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Tools grouped by module, then the functions left out and why.
    pub fn format_tools(tools: &ToolSet) -> String {
        let mut output = String::new();
        let mut current_module: Option<&str> = None;

        for tool in tools.iter() {
            if current_module != Some(tool.module.name.as_str()) {
                current_module = Some(tool.module.name.as_str());
                output.push_str(&format!(
                    "{} {}\n",
                    tool.module.name.cyan().bold(),
                    format!("({})", tool.module.mod_ref).dimmed()
                ));
            }
            output.push_str(&format!(
                "  {}  {}\n",
                tool.name().yellow().bold(),
                tool.function.short()
            ));
            for param in &tool.definition.parameters {
                output.push_str(&Self::parameter(param));
            }
        }

        if tools.is_empty() {
            output.push_str(&format!("{}\n", "No tools".dimmed()));
        }

        if !tools.skipped().is_empty() {
            output.push_str(&format!("\n{}\n", "Skipped:".yellow().bold()));
            for skipped in tools.skipped() {
                output.push_str(&format!(
                    "  {}/{}: {}\n",
                    skipped.module,
                    skipped.function,
                    skipped.reason.to_string().dimmed()
                ));
            }
        }

        output
    }

    fn parameter(param: &ToolParameter) -> String {
        let type_name = match param.param_type.items() {
            Some(items) => format!("[]{}", items),
            None => param.param_type.json_type().to_string(),
        };
        let required = if param.required {
            "required".red().to_string()
        } else {
            String::new()
        };
        let description = Self::indent(&param.description, "        ");
        let mut line = format!(
            "      {} {} {}",
            param.name.bold(),
            type_name.green(),
            required
        );
        line = line.trim_end().to_string();
        if !description.trim().is_empty() {
            line.push('\n');
            line.push_str(&description);
        }
        line.push('\n');
        line
    }

    /// Pretty JSON array of schemas.
    pub fn format_schemas(schemas: &[Value]) -> String {
        serde_json::to_string_pretty(schemas).unwrap_or_else(|_| "[]".to_string())
    }

    /// Call output as returned by the engine, pretty-printed when it is JSON.
    pub fn format_call_result(output: &str) -> String {
        serde_json::from_str::<Value>(output)
            .ok()
            .and_then(|v| serde_json::to_string_pretty(&v).ok())
            .unwrap_or_else(|| output.to_string())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
