//! Gmail Tools - Rust Implementation
//!
//! Runs the Gmail tools either as an MCP server on stdio or as a one-shot
//! guest call reading a request from stdin.

use clap::{Parser, Subcommand};
use tracing::info;

use gmail_tools::config::Config;
use gmail_tools::gmail::GmailGateway;
use gmail_tools::guest::{self, ChannelAdapter};
use gmail_tools::mcp::McpServer;

/// Gmail Tools
#[derive(Parser)]
#[command(name = "gmail-tools")]
#[command(author, version, about = "Gmail tools for MCP clients and plugin hosts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server on stdio (default)
    Serve,

    /// Read one `{"toolId", "arguments"}` request from stdin and write the outcome to stdout
    Call,

    /// Write the tool listing to stdout
    Describe,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries protocol traffic
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    info!(api_base_url = %config.api_base_url, user_id = %config.user_id, "configuration loaded");
    let gateway = GmailGateway::new(config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(async move {
                let mut server = McpServer::new(gateway);
                server.run_stdio().await
            })?;
        }
        Commands::Call => {
            let adapter = ChannelAdapter::new(gateway)?;
            std::process::exit(guest::call(&adapter));
        }
        Commands::Describe => {
            let adapter = ChannelAdapter::new(gateway)?;
            std::process::exit(guest::describe(&adapter));
        }
    }

    Ok(())
}
