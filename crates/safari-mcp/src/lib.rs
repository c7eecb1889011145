//! MCP Server for Safari
//!
//! This crate exposes macOS Safari browser control via the Model Context
//! Protocol (MCP), allowing assistants such as Claude Desktop to read and
//! drive tabs, windows, bookmarks, the Reading List and page content.
//!
//! # Architecture
//!
//! ```text
//! [ MCP Client ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ SafariMcpServer ]  protocol loop
//!        |
//!        v
//! [ Dispatcher ]       argument parsing, output shaping
//!        | (safari_script)
//!        v
//! [ osascript / plutil ]
//!        |
//!        +--> [ Safari.app ]
//!        +--> [ ~/Library/Safari/Bookmarks.plist ]
//! ```
//!
//! # Tools
//!
//! The server exposes 23 tools covering:
//! - Application lifecycle (open, activate)
//! - Tabs and windows (list, open, switch, close, search)
//! - Navigation (reload, back, forward)
//! - Page content (text, source, selection, JavaScript)
//! - Bookmarks and Reading List (read and add)

pub mod config;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use handlers::Dispatcher;
pub use server::SafariMcpServer;
pub use tools::{ToolContent, ToolDefinition, ToolResult, get_tool_definitions};
