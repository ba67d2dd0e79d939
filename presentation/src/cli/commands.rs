//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Tool-calling protocol whose schema shape is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaProtocol {
    /// OpenAI-style function calling
    #[value(name = "openai")]
    OpenAi,
    /// Model Context Protocol tools
    Mcp,
}

/// CLI arguments for langbridge
#[derive(Parser, Debug)]
#[command(name = "langbridge")]
#[command(author, version, about = "Expose engine module functions as LLM tools")]
#[command(long_about = r#"
langbridge introspects engine modules and exposes their functions as tools
for LLM tool-calling protocols, then dispatches tool calls back to the engine.

Module references are local paths (searched upward for dagger.json), git
references, or the names of dependencies listed in the nearest dagger.json.
Constructor arguments are read from <MODULE>_<ARG> environment variables.

Configuration files are loaded from (in priority order):
1. LANGBRIDGE_* environment variables
2. --config <path>       Explicit config file
3. ./langbridge.toml     Project-level config
4. ~/.config/langbridge/config.toml   Global config

Example:
  langbridge tools ./github
  langbridge schema github --protocol mcp
  langbridge call ./github github_issue-list '{"repo":"acme/widgets"}'
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the tools of one or more modules
    Tools {
        /// Module references (defaults to [tools].modules)
        #[arg(value_name = "REF")]
        modules: Vec<String>,
    },

    /// Print tool schemas as JSON
    Schema {
        /// Module references (defaults to [tools].modules)
        #[arg(value_name = "REF")]
        modules: Vec<String>,

        /// Schema shape to print
        #[arg(short, long, value_enum, default_value = "openai")]
        protocol: SchemaProtocol,
    },

    /// Invoke one tool and print its result
    Call {
        /// Module reference
        #[arg(value_name = "REF")]
        module: String,

        /// Tool name, e.g. github_issue-list
        #[arg(value_name = "TOOL")]
        tool: String,

        /// Arguments as a JSON object
        #[arg(value_name = "ARGS", default_value = "{}")]
        arguments: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_schema() {
        let cli = Cli::parse_from(["langbridge", "-vv", "schema", "github", "./ci", "-p", "mcp"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.command,
            Some(Command::Schema {
                modules: vec!["github".to_string(), "./ci".to_string()],
                protocol: SchemaProtocol::Mcp,
            })
        );
    }

    #[test]
    fn test_parse_call_defaults_arguments() {
        let cli = Cli::parse_from(["langbridge", "call", "./github", "github_version"]);
        assert_eq!(
            cli.command,
            Some(Command::Call {
                module: "./github".to_string(),
                tool: "github_version".to_string(),
                arguments: "{}".to_string(),
            })
        );
    }

    #[test]
    fn test_show_config_without_command() {
        let cli = Cli::parse_from(["langbridge", "--show-config"]);
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }
}
