//! Error types for the MCP server

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during MCP server operations
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown tool requested
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments missing or of the wrong type
    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    /// Error from running an automation command
    #[error(transparent)]
    Script(#[from] safari_script::Error),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file named explicitly but absent
    #[error("config file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Text shown to the MCP client for a failed tool call
    pub fn diagnostic(&self) -> String {
        match self {
            Error::Script(e) => e.diagnostic(),
            other => other.to_string(),
        }
    }
}
