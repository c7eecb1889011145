//! MCP tool catalog
//!
//! The fixed table of tools this server exposes, plus the result envelope
//! every tool call returns.
//!
//! # Tool Categories
//!
//! ## Application
//! - `safari_open` - Launch Safari
//! - `safari_activate` - Bring Safari to the front
//!
//! ## Tabs and Windows
//! - `safari_get_current_tab`, `safari_list_tabs`, `safari_list_windows`
//! - `safari_open_url`, `safari_new_window`
//! - `safari_switch_tab`, `safari_close_tab`, `safari_close_current_tab`, `safari_close_window`
//! - `safari_search_tabs`
//!
//! ## Navigation
//! - `safari_reload`, `safari_go_back`, `safari_go_forward`
//!
//! ## Page Content
//! - `safari_get_page_content`, `safari_get_page_source`, `safari_get_selected_text`
//! - `safari_execute_javascript`
//!
//! ## Bookmarks and Reading List
//! - `safari_get_bookmarks`, `safari_add_bookmark`
//! - `safari_get_reading_list`, `safari_add_to_reading_list`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// JSON type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
}

/// One named parameter of a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ToolParameter {
    pub fn required(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            required: true,
            default: None,
        }
    }

    pub fn optional(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type, description)
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl ToolDefinition {
    fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters: Vec::new(),
        }
    }

    fn param(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// JSON Schema for the tool's arguments, as MCP `inputSchema`
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for p in &self.parameters {
            let mut property = json!({
                "type": p.param_type,
                "description": p.description,
            });
            if let Some(default) = &p.default {
                property["default"] = default.clone();
            }
            properties.insert(p.name.clone(), property);
        }

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Result from a tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content types for tool results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
            is_error: None,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Text of the first content item
    pub fn first_text(&self) -> &str {
        match self.content.first() {
            Some(ToolContent::Text { text }) => text.as_str(),
            None => "",
        }
    }
}

fn window_index() -> ToolParameter {
    ToolParameter::optional(
        "windowIndex",
        ParamType::Number,
        "Window position, starting at 1 for the front window",
    )
    .with_default(json!(1))
}

fn tab_index() -> ToolParameter {
    ToolParameter::required(
        "tabIndex",
        ParamType::Number,
        "Tab position within the window, starting at 1",
    )
}

/// Get all available tool definitions, in registration order
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        // Application
        ToolDefinition::new("safari_open", "Launch Safari, opening a window if none is open"),
        ToolDefinition::new("safari_activate", "Bring Safari to the front"),
        // Tabs and Windows
        ToolDefinition::new(
            "safari_get_current_tab",
            "Get the title and URL of the current tab in the front window",
        ),
        ToolDefinition::new(
            "safari_list_tabs",
            "List every tab in every Safari window with its title and URL",
        ),
        ToolDefinition::new(
            "safari_list_windows",
            "List Safari windows with their names and tab counts",
        ),
        ToolDefinition::new("safari_open_url", "Open a URL in Safari")
            .param(ToolParameter::required("url", ParamType::String, "URL to open"))
            .param(
                ToolParameter::optional(
                    "newTab",
                    ParamType::Boolean,
                    "Open in a new tab; false replaces the current tab's page",
                )
                .with_default(json!(true)),
            )
            .param(
                ToolParameter::optional(
                    "newWindow",
                    ParamType::Boolean,
                    "Open in a new window (takes precedence over newTab)",
                )
                .with_default(json!(false)),
            ),
        ToolDefinition::new("safari_new_window", "Open a new Safari window").param(
            ToolParameter::optional("url", ParamType::String, "URL to load in the new window"),
        ),
        ToolDefinition::new("safari_switch_tab", "Make a tab the current tab of its window")
            .param(tab_index())
            .param(window_index()),
        ToolDefinition::new("safari_close_tab", "Close a tab by position")
            .param(tab_index())
            .param(window_index()),
        ToolDefinition::new(
            "safari_close_current_tab",
            "Close the current tab of the front window",
        ),
        ToolDefinition::new("safari_close_window", "Close a Safari window by position")
            .param(window_index()),
        // Navigation
        ToolDefinition::new("safari_reload", "Reload the current page"),
        ToolDefinition::new("safari_go_back", "Go back in the current tab's history"),
        ToolDefinition::new("safari_go_forward", "Go forward in the current tab's history"),
        // Page Content
        ToolDefinition::new(
            "safari_get_page_content",
            "Get the visible text of the current page",
        ),
        ToolDefinition::new(
            "safari_get_page_source",
            "Get the HTML source of the current page",
        ),
        ToolDefinition::new(
            "safari_get_selected_text",
            "Get the text currently selected on the page",
        ),
        ToolDefinition::new(
            "safari_execute_javascript",
            "Run JavaScript in the current tab and return its result. \
             Requires 'Allow JavaScript from Apple Events' in Safari's Develop menu",
        )
        .param(ToolParameter::required(
            "script",
            ParamType::String,
            "JavaScript source to evaluate",
        )),
        ToolDefinition::new(
            "safari_search_tabs",
            "Find open tabs whose title or URL contains the query (case-insensitive)",
        )
        .param(ToolParameter::required(
            "query",
            ParamType::String,
            "Text to look for",
        )),
        // Bookmarks and Reading List
        ToolDefinition::new("safari_get_bookmarks", "List bookmarks in matching folders").param(
            ToolParameter::optional(
                "folder",
                ParamType::String,
                "Folder name to match (case-insensitive substring); '*' lists every folder",
            )
            .with_default(json!("*")),
        ),
        ToolDefinition::new("safari_get_reading_list", "List Reading List items").param(
            ToolParameter::optional("limit", ParamType::Number, "Maximum number of items")
                .with_default(json!(50)),
        ),
        ToolDefinition::new(
            "safari_add_bookmark",
            "Open Safari's Add Bookmark dialog for a URL or the current page. \
             Only confirms that the dialog was opened",
        )
        .param(ToolParameter::optional(
            "url",
            ParamType::String,
            "URL to load before bookmarking; defaults to the current page",
        )),
        ToolDefinition::new(
            "safari_add_to_reading_list",
            "Add a URL, or the current page, to the Reading List",
        )
        .param(ToolParameter::optional(
            "url",
            ParamType::String,
            "URL to add; defaults to the current page",
        ))
        .param(ToolParameter::optional(
            "title",
            ParamType::String,
            "Title for the Reading List entry",
        )),
    ]
}
