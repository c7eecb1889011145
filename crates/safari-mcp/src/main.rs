//! Safari MCP Server
//!
//! A Model Context Protocol server that lets assistants control Safari on
//! macOS.
//!
//! # Usage
//!
//! ```bash
//! safari-mcp [--config <file>] [--plist <path>] [--max-output-bytes <n>]
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Control log verbosity (default: `safari_mcp=info`)
//! - `SAFARI_MCP_CONFIG`: Config file, same as `--config`
//! - `SAFARI_BOOKMARKS_PLIST`: Bookmark store, same as `--plist`
//!
//! # Protocol
//!
//! The server communicates via JSON-RPC 2.0 over stdio:
//! - Requests/responses go through stdout
//! - Logs go to stderr (to avoid interfering with the protocol)

use std::path::PathBuf;

use clap::Parser;
use safari_mcp::{SafariMcpServer, ServerConfig};

/// MCP server for Safari
#[derive(Parser)]
#[command(name = "safari-mcp")]
#[command(about = "MCP server for controlling Safari")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "SAFARI_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Safari bookmarks property list
    #[arg(long, env = "SAFARI_BOOKMARKS_PLIST")]
    plist: Option<PathBuf>,

    /// Maximum bytes of output buffered from a single command
    #[arg(long)]
    max_output_bytes: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging to stderr (stdout is reserved for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("safari_mcp=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(plist) = args.plist {
        config.bookmarks_plist = plist;
    }
    if let Some(limit) = args.max_output_bytes {
        config.max_output_bytes = limit;
    }

    tracing::info!(
        plist = %config.bookmarks_plist.display(),
        max_output_bytes = config.max_output_bytes,
        "Starting safari-mcp server"
    );

    let mut server = SafariMcpServer::new(config);
    server.run().await?;

    Ok(())
}
