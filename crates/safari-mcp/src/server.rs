//! MCP Server implementation
//!
//! The main server struct that speaks the MCP protocol over stdio and hands
//! tool calls to the [`Dispatcher`].

use std::io::{BufRead, Write};
use std::sync::Arc;

use safari_script::{CommandRunner, ProcessRunner};
use serde_json::{Value, json};

use crate::config::ServerConfig;
use crate::handlers::Dispatcher;
use crate::protocol::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, InitializeParams, InitializeResult, JsonRpcRequest,
    JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION, ServerCapabilities,
    ServerInfo, ToolCallParams, ToolsCapability,
};
use crate::tools::ToolDefinition;
use crate::{Error, Result};

/// MCP Server for Safari
///
/// Requests are handled one at a time; a tool call blocks until its
/// external command exits.
///
/// # Example
///
/// ```ignore
/// use safari_mcp::{SafariMcpServer, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut server = SafariMcpServer::new(ServerConfig::default());
///     server.run().await?;
///     Ok(())
/// }
/// ```
pub struct SafariMcpServer {
    dispatcher: Dispatcher,
}

impl SafariMcpServer {
    /// Create a server that runs real `osascript`/`plutil` processes
    pub fn new(config: ServerConfig) -> Self {
        let runner = Arc::new(ProcessRunner::with_output_limit(config.max_output_bytes));
        Self::with_runner(runner, config)
    }

    /// Create a server on top of any [`CommandRunner`]
    pub fn with_runner(runner: Arc<dyn CommandRunner>, config: ServerConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(runner, config),
        }
    }

    /// Run the MCP server
    ///
    /// Processes newline-delimited JSON-RPC messages from stdin until it
    /// closes, writing responses to stdout. Lines are decoded lossily, so
    /// invalid UTF-8 gets a parse error instead of ending the session.
    pub async fn run(&mut self) -> Result<()> {
        let stdin = std::io::stdin();
        let mut reader = stdin.lock();
        let mut stdout = std::io::stdout();
        let mut buf = Vec::new();

        tracing::info!(tools = self.tools().len(), "MCP server ready, listening on stdio");

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let decoded = String::from_utf8_lossy(&buf);
            let line = decoded.trim();
            if line.is_empty() {
                continue;
            }

            tracing::debug!(request = %line, "Received message");

            match self.handle_message(line).await {
                Ok(response) if !response.is_empty() => {
                    writeln!(stdout, "{}", response)?;
                    stdout.flush()?;
                }
                Ok(_) => {} // No response needed (notifications)
                Err(e) => {
                    let error_response = JsonRpcResponse::error(
                        None,
                        INTERNAL_ERROR,
                        format!("Internal error: {}", e),
                    );
                    let json_str = serde_json::to_string(&error_response)?;
                    writeln!(stdout, "{}", json_str)?;
                    stdout.flush()?;
                }
            }
        }

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle a single MCP message
    ///
    /// Returns the JSON-RPC response as a string, or an empty string for
    /// notifications. A line that is not JSON gets a parse error response,
    /// and JSON that is not a request object gets an invalid request
    /// response; neither ends the session.
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable message");
                let response =
                    JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {}", e));
                return serde_json::to_string(&response).map_err(Error::from);
            }
        };

        let id = value.get("id").cloned();
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed request");
                let response =
                    JsonRpcResponse::error(id, INVALID_REQUEST, format!("Invalid request: {}", e));
                return serde_json::to_string(&response).map_err(Error::from);
            }
        };

        if request.is_notification() {
            tracing::debug!(method = %request.method, "Notification received");
            return Ok(String::new());
        }

        if request.jsonrpc != "2.0" {
            let response = JsonRpcResponse::error(
                request.id,
                INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {}", request.jsonrpc),
            );
            return serde_json::to_string(&response).map_err(Error::from);
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params).await?,
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id).await,
            "tools/call" => self.handle_tools_call(request.id, request.params).await?,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        serde_json::to_string(&response).map_err(Error::from)
    }

    /// Handle the initialize request
    ///
    /// Returns server capabilities and info.
    async fn handle_initialize(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        if let Ok(params) = serde_json::from_value::<InitializeParams>(params) {
            tracing::info!(
                client = %params.client_info.name,
                client_version = %params.client_info.version,
                protocol = %params.protocol_version,
                "Client connected"
            );
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: "safari-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    /// Handle tools/list request
    async fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools_value: Vec<Value> = self
            .tools()
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema()
                })
            })
            .collect();

        JsonRpcResponse::success(id, json!({ "tools": tools_value }))
    }

    /// Handle tools/call request
    ///
    /// Tool failures are reported inside the result with `isError: true`;
    /// only malformed params produce a JSON-RPC error.
    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let tool_params: ToolCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                ));
            }
        };

        tracing::info!(tool = %tool_params.name, "Tool call");
        let tool_result = self
            .dispatcher
            .handle(&tool_params.name, tool_params.arguments);

        Ok(JsonRpcResponse::success(id, serde_json::to_value(tool_result)?))
    }

    /// Get available tools
    pub fn tools(&self) -> &[ToolDefinition] {
        self.dispatcher.tools()
    }

    pub fn config(&self) -> &ServerConfig {
        self.dispatcher.config()
    }
}
