//! CLI entrypoint for langbridge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use langbridge_application::{
    DispatchToolUseCase, LoadToolsInput, LoadToolsUseCase, QueryTransport, ToolSchemaPort, ToolSet,
};
use langbridge_domain::ModuleSourceRef;
use langbridge_infrastructure::{
    ConfigLoader, EngineClient, EngineSettings, FileConfig, FunctionCallingConverter,
    LocalWorkspace, McpToolConverter, ProcessEnvironment,
};
use langbridge_presentation::{Cli, Command, ConsoleFormatter, SchemaProtocol};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; stdout carries results only
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    config.validate()?;

    let Some(command) = cli.command else {
        bail!("No command given. Run with --help for usage.");
    };

    // === Dependency Injection ===
    let environment = Arc::new(ProcessEnvironment);
    let settings = EngineSettings::resolve(&config.engine, environment.as_ref())?;
    info!(endpoint = %settings.endpoint, "Connecting to engine");
    let transport: Arc<dyn QueryTransport> = Arc::new(EngineClient::new(settings)?);
    let workspace = Arc::new(
        LocalWorkspace::new()
            .with_config_file(config.resolver.config_file.clone())
            .with_boundary_markers(config.resolver.boundary_markers.clone()),
    );
    let load_tools = LoadToolsUseCase::new(transport.clone(), workspace, environment);

    // Ctrl-C cancels whatever is in flight
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    match command {
        Command::Tools { modules } => {
            let input = load_input(&config, &modules)?;
            let tools = load_tools.execute(input, &cancel).await?;
            print!("{}", ConsoleFormatter::format_tools(&tools));
        }
        Command::Schema { modules, protocol } => {
            let input = load_input(&config, &modules)?;
            let tools = load_tools.execute(input, &cancel).await?;
            println!("{}", ConsoleFormatter::format_schemas(&schemas(&tools, protocol)));
        }
        Command::Call {
            module,
            tool,
            arguments,
        } => {
            let input = load_input(&config, std::slice::from_ref(&module))?;
            let tools = load_tools.execute(input, &cancel).await?;
            let dispatch = DispatchToolUseCase::new(transport, Arc::new(tools));
            let output = dispatch.call(&tool, &arguments, &cancel).await?;
            println!("{}", ConsoleFormatter::format_call_result(&output));
        }
    }

    Ok(())
}

/// Module references from the command line, falling back to `[tools].modules`.
fn load_input(config: &FileConfig, modules: &[String]) -> Result<LoadToolsInput> {
    let references: &[String] = if modules.is_empty() {
        &config.tools.modules
    } else {
        modules
    };
    if references.is_empty() {
        bail!("No module given. Pass a module reference or set [tools].modules.");
    }
    Ok(
        LoadToolsInput::new(references.iter().map(|r| ModuleSourceRef::new(r.as_str())))
            .with_options(config.load_options()),
    )
}

fn schemas(tools: &ToolSet, protocol: SchemaProtocol) -> Vec<serde_json::Value> {
    let converter: &dyn ToolSchemaPort = match protocol {
        SchemaProtocol::OpenAi => &FunctionCallingConverter,
        SchemaProtocol::Mcp => &McpToolConverter,
    };
    tools.schemas(converter)
}
