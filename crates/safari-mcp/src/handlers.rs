//! MCP Tool Handlers
//!
//! This module implements the handlers for MCP tool calls. Each handler
//! renders a script with `safari_script::safari`, runs it through the
//! injected [`CommandRunner`], and post-processes the output.
//!
//! Every outcome, including failures, is returned as a [`ToolResult`]:
//! tool errors are content for the model to read, not protocol errors.

use std::sync::Arc;

use safari_script::bookmarks::{ALL_FOLDERS, format_bookmarks, format_reading_list};
use safari_script::safari::{self, OpenTarget};
use safari_script::{BookmarkNode, CommandRunner, Invocation, Script};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::tools::{ToolDefinition, ToolResult, get_tool_definitions};
use crate::{Error, Result};

/// Returned by `safari_execute_javascript` when the script yields nothing
pub const NO_RETURN_VALUE: &str = "JavaScript executed (no return value)";

/// Routes tool calls to their handlers
pub struct Dispatcher {
    runner: Arc<dyn CommandRunner>,
    config: ServerConfig,
    tools: Vec<ToolDefinition>,
}

impl Dispatcher {
    pub fn new(runner: Arc<dyn CommandRunner>, config: ServerConfig) -> Self {
        Self {
            runner,
            config,
            tools: get_tool_definitions(),
        }
    }

    /// Registered tools, in registration order
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Handle a tool call, always producing a single-item envelope
    pub fn handle(&self, tool_name: &str, arguments: Value) -> ToolResult {
        if !self.tools.iter().any(|t| t.name == tool_name) {
            warn!(tool = tool_name, "Unknown tool requested");
            return ToolResult::error(Error::UnknownTool(tool_name.to_string()).to_string());
        }

        match self.dispatch(tool_name, arguments) {
            Ok(text) => ToolResult::text(text),
            Err(e) => {
                warn!(tool = tool_name, error = %e, "Tool call failed");
                ToolResult::error(format!("Error: {}", e.diagnostic()))
            }
        }
    }

    fn dispatch(&self, tool_name: &str, arguments: Value) -> Result<String> {
        match tool_name {
            // Application
            "safari_open" => self.run_script(&safari::open()),
            "safari_activate" => self.run_script(&safari::activate()),

            // Tabs and Windows
            "safari_get_current_tab" => self.run_script(&safari::current_tab()),
            "safari_list_tabs" => self.run_script(&safari::list_tabs()),
            "safari_list_windows" => self.run_script(&safari::list_windows()),
            "safari_open_url" => self.handle_open_url(parse_args(tool_name, arguments)?),
            "safari_new_window" => self.handle_new_window(parse_args(tool_name, arguments)?),
            "safari_switch_tab" => {
                let args: TabArgs = parse_args(tool_name, arguments)?;
                self.run_script(&safari::switch_tab(args.window_index, args.tab_index))
            }
            "safari_close_tab" => {
                let args: TabArgs = parse_args(tool_name, arguments)?;
                self.run_script(&safari::close_tab(args.window_index, args.tab_index))
            }
            "safari_close_current_tab" => self.run_script(&safari::close_current_tab()),
            "safari_close_window" => {
                let args: WindowArgs = parse_args(tool_name, arguments)?;
                self.run_script(&safari::close_window(args.window_index))
            }
            "safari_search_tabs" => {
                let args: SearchArgs = parse_args(tool_name, arguments)?;
                self.run_script(&safari::search_tabs(&args.query))
            }

            // Navigation
            "safari_reload" => self.run_script(&safari::reload()),
            "safari_go_back" => self.run_script(&safari::go_back()),
            "safari_go_forward" => self.run_script(&safari::go_forward()),

            // Page Content
            "safari_get_page_content" => self.run_script(&safari::page_content()),
            "safari_get_page_source" => self.run_script(&safari::page_source()),
            "safari_get_selected_text" => self.run_script(&safari::selected_text()),
            "safari_execute_javascript" => {
                self.handle_execute_javascript(parse_args(tool_name, arguments)?)
            }

            // Bookmarks and Reading List
            "safari_get_bookmarks" => self.handle_get_bookmarks(parse_args(tool_name, arguments)?),
            "safari_get_reading_list" => {
                self.handle_get_reading_list(parse_args(tool_name, arguments)?)
            }
            "safari_add_bookmark" => self.handle_add_bookmark(parse_args(tool_name, arguments)?),
            "safari_add_to_reading_list" => {
                self.handle_add_to_reading_list(parse_args(tool_name, arguments)?)
            }

            _ => Err(Error::UnknownTool(tool_name.to_string())),
        }
    }

    fn run_script(&self, script: &Script) -> Result<String> {
        debug!(script = %script, "Running AppleScript");
        let invocation = Invocation::osascript(&self.config.osascript, script);
        Ok(self.runner.run(&invocation)?)
    }

    /// Safari's bookmark store rendered as JSON text
    fn read_bookmarks_json(&self) -> Result<String> {
        let invocation =
            Invocation::plist_to_json(&self.config.plutil, &self.config.bookmarks_plist);
        Ok(self.runner.run(&invocation)?)
    }

    /// Parse bookmark JSON and render it with `render`.
    ///
    /// `plutil` reports some failures (unsupported plist values, missing
    /// files under sandboxing) as plain text on stdout, so unparseable output
    /// is handed back verbatim instead of being treated as an error.
    fn with_bookmarks(&self, render: impl FnOnce(&BookmarkNode) -> String) -> Result<String> {
        let json = self.read_bookmarks_json()?;
        match BookmarkNode::parse(&json) {
            Ok(root) => Ok(render(&root)),
            Err(e) => {
                warn!(error = %e, "Bookmark data is not JSON, returning it verbatim");
                Ok(json)
            }
        }
    }

    fn handle_open_url(&self, args: OpenUrlArgs) -> Result<String> {
        let target = OpenTarget::from_flags(args.new_tab, args.new_window);
        let output = self.run_script(&safari::open_url(&args.url, target))?;
        Ok(or_confirmation(output, || {
            format!("Opened {} in {}", args.url, target.describe())
        }))
    }

    fn handle_new_window(&self, args: UrlArgs) -> Result<String> {
        let output = self.run_script(&safari::new_window(args.url.as_deref()))?;
        Ok(or_confirmation(output, || match &args.url {
            Some(url) => format!("Opened new window with {url}"),
            None => "Opened new window".to_string(),
        }))
    }

    fn handle_execute_javascript(&self, args: ScriptArgs) -> Result<String> {
        let output = self.run_script(&safari::execute_javascript(&args.script))?;
        Ok(or_confirmation(output, || NO_RETURN_VALUE.to_string()))
    }

    fn handle_get_bookmarks(&self, args: BookmarksArgs) -> Result<String> {
        let folder = args.folder.unwrap_or_else(|| ALL_FOLDERS.to_string());
        self.with_bookmarks(|root| format_bookmarks(root, &folder))
    }

    fn handle_get_reading_list(&self, args: ReadingListArgs) -> Result<String> {
        let limit = args.limit.unwrap_or(self.config.reading_list_limit);
        self.with_bookmarks(|root| format_reading_list(root, limit))
    }

    fn handle_add_bookmark(&self, args: UrlArgs) -> Result<String> {
        let script = safari::add_bookmark(args.url.as_deref(), self.config.page_load_delay_secs);
        let output = self.run_script(&script)?;
        Ok(or_confirmation(output, || {
            format!(
                "Bookmark dialog opened for {}",
                args.url.as_deref().unwrap_or("current page")
            )
        }))
    }

    fn handle_add_to_reading_list(&self, args: ReadingListAddArgs) -> Result<String> {
        let script = safari::add_to_reading_list(args.url.as_deref(), args.title.as_deref());
        let output = self.run_script(&script)?;
        Ok(or_confirmation(output, || match &args.url {
            Some(url) => format!("Added {url} to Reading List"),
            None => "Add to Reading List initiated for current page".to_string(),
        }))
    }
}

/// Script output when there is some, otherwise the handler's own message
fn or_confirmation(output: String, confirmation: impl FnOnce() -> String) -> String {
    if output.is_empty() {
        confirmation()
    } else {
        output
    }
}

/// Deserialize tool arguments; absent arguments count as `{}`
fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| Error::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

fn default_true() -> bool {
    true
}

fn first() -> u32 {
    1
}

/// Arguments for safari_open_url
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenUrlArgs {
    url: String,
    #[serde(default = "default_true")]
    new_tab: bool,
    #[serde(default)]
    new_window: bool,
}

/// Arguments for safari_switch_tab and safari_close_tab
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TabArgs {
    tab_index: u32,
    #[serde(default = "first")]
    window_index: u32,
}

/// Arguments for safari_close_window
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WindowArgs {
    #[serde(default = "first")]
    window_index: u32,
}

#[derive(Debug, Deserialize)]
struct UrlArgs {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScriptArgs {
    script: String,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
}

#[derive(Debug, Deserialize)]
struct BookmarksArgs {
    #[serde(default)]
    folder: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReadingListArgs {
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ReadingListAddArgs {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
}
