//! Stdio serve loop.
//!
//! Reads one message per line, answers requests in order and stays silent
//! for notifications. The loop only ends when the input closes or the
//! output can no longer be written.

use std::io::{BufRead, Write};

use meteo_mcp::protocol::{
    CallToolParams, InitializeResult, JsonRpcError, JsonRpcMessage, JsonRpcNotification,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, MCP_PROTOCOL_VERSION, ServerCapabilities,
    ServerInfo, ToolsCapability, methods,
};
use meteo_mcp::{McpError, Result, read_message, write_message};
use serde_json::{Value, json};

use crate::tools::ToolRegistry;

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "weather-server";

/// MCP server answering `initialize`, `ping`, `tools/list` and `tools/call`.
pub struct McpServer {
    registry: ToolRegistry,
    info: ServerInfo,
}

impl McpServer {
    /// Create a server over a tool registry.
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Serve until `reader` reaches end of stream.
    ///
    /// Undecodable lines are answered with a parse error carrying a null id
    /// and do not stop the loop. I/O failures do.
    pub fn serve<R, W>(&self, reader: &mut R, writer: &mut W) -> Result<()>
    where
        R: BufRead + ?Sized,
        W: Write + ?Sized,
    {
        tracing::info!(server = %self.info.name, tools = self.registry.len(), "serving on stdio");

        loop {
            let response = match read_message(reader) {
                Ok(Some(message)) => self.handle_message(message),
                Ok(None) => {
                    tracing::info!("input closed, shutting down");
                    return Ok(());
                }
                Err(McpError::Malformed { line, reason }) => {
                    tracing::warn!(%line, %reason, "failed to parse message");
                    Some(JsonRpcResponse::failure(
                        None,
                        JsonRpcError::new(
                            JsonRpcError::PARSE_ERROR,
                            format!("Parse error: {reason}"),
                        ),
                    ))
                }
                Err(e) => return Err(e),
            };

            if let Some(response) = response {
                write_message(writer, &response)?;
            }
        }
    }

    /// Handle one decoded message. Only requests produce a response.
    pub fn handle_message(&self, message: JsonRpcMessage) -> Option<JsonRpcResponse> {
        match message {
            JsonRpcMessage::Request(request) => Some(self.handle_request(request)),
            JsonRpcMessage::Notification(notification) => {
                self.handle_notification(&notification);
                None
            }
            JsonRpcMessage::Response(response) => {
                tracing::debug!(id = ?response.id, "ignoring response from client");
                None
            }
        }
    }

    /// Answer a request.
    pub fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!(id = request.id, method = %request.method, "handling request");

        let outcome = match request.method.as_str() {
            methods::INITIALIZE => self.initialize(),
            methods::PING => Ok(json!({})),
            methods::TOOLS_LIST => self.list_tools(),
            methods::TOOLS_CALL => self.call_tool(request.params),
            other => Err(JsonRpcError::new(
                JsonRpcError::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        };

        match outcome {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(error) => {
                tracing::warn!(
                    id = request.id,
                    method = %request.method,
                    code = error.code,
                    message = %error.message,
                    "request failed"
                );
                JsonRpcResponse::failure(Some(request.id), error)
            }
        }
    }

    fn handle_notification(&self, notification: &JsonRpcNotification) {
        if notification.method == methods::INITIALIZED {
            tracing::info!("client initialized");
        } else {
            tracing::debug!(method = %notification.method, "ignoring notification");
        }
    }

    fn initialize(&self) -> std::result::Result<Value, JsonRpcError> {
        to_value(&InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                experimental: None,
            },
            server_info: self.info.clone(),
        })
    }

    fn list_tools(&self) -> std::result::Result<Value, JsonRpcError> {
        to_value(&ListToolsResult {
            tools: self.registry.list_tools(),
        })
    }

    fn call_tool(&self, params: Option<Value>) -> std::result::Result<Value, JsonRpcError> {
        let params = params.ok_or_else(|| {
            JsonRpcError::new(JsonRpcError::INVALID_PARAMS, "Missing params for tools/call")
        })?;
        let params: CallToolParams = serde_json::from_value(params).map_err(|e| {
            JsonRpcError::new(
                JsonRpcError::INVALID_PARAMS,
                format!("Invalid params for tools/call: {e}"),
            )
        })?;

        let arguments = params.arguments.unwrap_or_else(|| json!({}));
        to_value(&self.registry.call(&params.name, &arguments))
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> std::result::Result<Value, JsonRpcError> {
    serde_json::to_value(value)
        .map_err(|e| JsonRpcError::new(JsonRpcError::INTERNAL_ERROR, e.to_string()))
}
