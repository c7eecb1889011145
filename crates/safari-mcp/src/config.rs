//! Server configuration
//!
//! Settings resolve in this order (later sources override earlier):
//!
//! 1. **Built-in defaults** - see [`ServerConfig::default`]
//! 2. **Config file** - TOML, named by `--config` or `SAFARI_MCP_CONFIG`
//! 3. **Command line** - `--plist`, `--max-output-bytes` (and their env vars)
//!
//! # Example
//!
//! ```toml
//! bookmarks_plist = "/Users/me/Library/Safari/Bookmarks.plist"
//! max_output_bytes = 10485760
//! reading_list_limit = 20
//! page_load_delay_secs = 2.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use safari_script::DEFAULT_OUTPUT_LIMIT;
use safari_script::bookmarks::DEFAULT_READING_LIST_LIMIT;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Runtime settings for the server and its external commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// AppleScript interpreter
    pub osascript: String,

    /// Property list converter used for bookmark reads
    pub plutil: String,

    /// Safari's bookmark store
    pub bookmarks_plist: PathBuf,

    /// Ceiling on buffered stdout per command
    pub max_output_bytes: u64,

    /// Reading List item count when the caller gives no `limit`
    pub reading_list_limit: usize,

    /// Seconds to wait for a page to load before sending a keyboard shortcut
    pub page_load_delay_secs: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            osascript: "osascript".to_string(),
            plutil: "plutil".to_string(),
            bookmarks_plist: default_bookmarks_plist(),
            max_output_bytes: DEFAULT_OUTPUT_LIMIT,
            reading_list_limit: DEFAULT_READING_LIST_LIMIT,
            page_load_delay_secs: 1.0,
        }
    }
}

impl ServerConfig {
    /// Load configuration, reading `path` when given.
    ///
    /// A path that was asked for but does not exist is an error rather than
    /// a silent fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// `~/Library/Safari/Bookmarks.plist`
pub fn default_bookmarks_plist() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join("Library/Safari/Bookmarks.plist")
}
