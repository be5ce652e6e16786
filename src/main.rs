//! BoardGameGeek MCP server entry point.
//!
//! Parses the command line, loads configuration, initializes logging and
//! starts the server on the configured transport.

use anyhow::Result;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use bgg_mcp_server::core::{Config, McpServer, TransportOverrides, TransportService};

/// BoardGameGeek MCP server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Transport mode: stdio or http. MCP_TRANSPORT / MCP_MODE take precedence.
    #[arg(long)]
    mode: Option<String>,

    /// HTTP port. MCP_HTTP_PORT / MCP_PORT take precedence.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let overrides = TransportOverrides {
        mode: cli.mode,
        port: cli.port,
    };

    let config = Config::load(&overrides)?;

    init_logging(&config.logging.level, config.logging.with_timestamps);

    info!("Starting {} v{}", config.server.name, config.server.version);
    config.log_startup_notes();

    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::new(config);

    info!("Server initialized");

    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout belongs to the STDIO transport.
fn init_logging(level: &str, with_timestamps: bool) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
