//! MCP client for communicating with an MCP server over stdio.

use serde_json::Value;

use crate::error::{McpError, Result};
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcNotification,
    JsonRpcRequest, ListToolsResult, ServerInfo, ToolInfo, methods,
};
use crate::transport::McpTransport;

/// Configuration for an MCP server process.
#[derive(Debug, Clone)]
pub struct McpServerConfig {
    /// Name used in logs.
    pub name: String,
    /// Command to spawn.
    pub command: String,
    /// Arguments to pass to the command.
    pub args: Vec<String>,
    /// Environment variables to set.
    pub env: Vec<(String, String)>,
}

impl McpServerConfig {
    /// Create a new server config.
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Add arguments.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Add an argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add an environment variable.
    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// An MCP client connected to a single MCP server.
///
/// Strictly synchronous: every call writes one request and blocks until
/// the matching response arrives, so at most one request is in flight.
pub struct McpClient {
    /// Server configuration.
    config: McpServerConfig,
    /// Transport; `None` once the client has been closed.
    transport: Option<McpTransport>,
    /// Server info (after initialization).
    server_info: Option<ServerInfo>,
    /// Last request ID handed out. Pre-incremented, so the first is 1.
    request_id: u64,
}

impl McpClient {
    /// Spawn the server process.
    ///
    /// This does NOT initialize the connection. Call `initialize()` after
    /// connecting to complete the handshake.
    pub fn connect(config: McpServerConfig) -> Result<Self> {
        let env = if config.env.is_empty() {
            None
        } else {
            Some(config.env.as_slice())
        };

        let transport = McpTransport::spawn_stdio(&config.command, &config.args, env)?;

        tracing::info!(
            server = %config.name,
            command = %config.command,
            "started MCP server"
        );

        Ok(Self {
            config,
            transport: Some(transport),
            server_info: None,
            request_id: 0,
        })
    }

    /// Get the server info (after initialization).
    pub fn server_info(&self) -> Option<&ServerInfo> {
        self.server_info.as_ref()
    }

    /// Check if the client has been initialized.
    pub fn is_initialized(&self) -> bool {
        self.server_info.is_some() && self.transport.is_some()
    }

    /// Get the next request ID.
    fn next_request_id(&mut self) -> u64 {
        self.request_id += 1;
        self.request_id
    }

    fn transport(&mut self) -> Result<&mut McpTransport> {
        self.transport.as_mut().ok_or(McpError::NotInitialized)
    }

    /// Send a request and wait for its response.
    fn send_request(&mut self, method: &str, params: Option<Value>) -> Result<Value> {
        let id = self.next_request_id();
        let request = JsonRpcRequest::new(id, method, params);

        let response = self.transport()?.send_request(&request)?;

        match response.id {
            Some(got) if got != id => {
                return Err(McpError::protocol(format!(
                    "response id {} does not match request id {}",
                    got, id
                )));
            }
            None if !response.is_error() => {
                return Err(McpError::protocol(format!(
                    "response to request {} carries no id",
                    id
                )));
            }
            _ => {}
        }

        response
            .into_result()
            .map_err(|e| McpError::server_error(e.code, e.message, e.data))
    }

    /// Send a notification (no response expected).
    fn send_notification(&mut self, method: &str, params: Option<Value>) -> Result<()> {
        let notification = JsonRpcNotification::new(method, params);
        self.transport()?.send_notification(&notification)
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(McpError::NotInitialized)
        }
    }

    /// Initialize the connection with the MCP server.
    ///
    /// Performs the one-shot handshake: `initialize`, then the
    /// `notifications/initialized` acknowledgement. Must be called before
    /// any other operation.
    pub fn initialize(&mut self) -> Result<&ServerInfo> {
        if self.is_initialized() {
            return self.server_info.as_ref().ok_or(McpError::NotInitialized);
        }

        let params = InitializeParams::default();
        let result = self.send_request(methods::INITIALIZE, Some(serde_json::to_value(&params)?))?;

        let init_result: InitializeResult = serde_json::from_value(result)?;

        tracing::info!(
            server = %init_result.server_info.name,
            version = %init_result.server_info.version,
            protocol = %init_result.protocol_version,
            "MCP server initialized"
        );

        self.send_notification(methods::INITIALIZED, None)?;

        Ok(self.server_info.insert(init_result.server_info))
    }

    /// List available tools from the server.
    pub fn list_tools(&mut self) -> Result<Vec<ToolInfo>> {
        self.ensure_initialized()?;

        let result = self.send_request(methods::TOOLS_LIST, None)?;
        let list_result: ListToolsResult = serde_json::from_value(result)?;

        tracing::debug!(
            server = %self.config.name,
            tool_count = list_result.tools.len(),
            "listed MCP tools"
        );

        Ok(list_result.tools)
    }

    /// Call a tool on the server.
    ///
    /// # Arguments
    /// * `name` - The name of the tool to call
    /// * `arguments` - The arguments to pass to the tool
    pub fn call_tool(&mut self, name: &str, arguments: Value) -> Result<CallToolResult> {
        self.ensure_initialized()?;

        let params = CallToolParams {
            name: name.to_string(),
            arguments: Some(arguments),
        };

        let result = self.send_request(methods::TOOLS_CALL, Some(serde_json::to_value(&params)?))?;
        let call_result: CallToolResult = serde_json::from_value(result)?;

        tracing::debug!(
            server = %self.config.name,
            tool = %name,
            is_error = call_result.is_error(),
            "tool call returned"
        );

        Ok(call_result)
    }

    /// Terminate the server process and wait for it to exit.
    ///
    /// Every later call fails with [`McpError::NotInitialized`].
    pub fn close(&mut self) -> Result<()> {
        let Some(mut transport) = self.transport.take() else {
            return Ok(());
        };

        tracing::info!(server = %self.config.name, "shutting down MCP server");
        transport.shutdown()
    }

    /// Check if the server process is still running.
    pub fn is_connected(&mut self) -> bool {
        self.transport
            .as_mut()
            .is_some_and(|transport| transport.is_connected())
    }
}

impl Drop for McpClient {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_builder() {
        let config = McpServerConfig::new("weather", "meteo-server")
            .with_arg("--verbose")
            .with_env_var("RUST_LOG", "debug");

        assert_eq!(config.name, "weather");
        assert_eq!(config.command, "meteo-server");
        assert_eq!(config.args, vec!["--verbose"]);
        assert_eq!(config.env, vec![("RUST_LOG".to_string(), "debug".to_string())]);
    }

    #[test]
    fn test_connect_nonexistent_server() {
        let config = McpServerConfig::new("test", "nonexistent-mcp-server-12345");
        let result = McpClient::connect(config);
        assert!(matches!(result, Err(McpError::SpawnFailed(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_operations_require_initialize() {
        let mut client = McpClient::connect(McpServerConfig::new("cat", "cat")).unwrap();
        assert!(!client.is_initialized());

        assert!(matches!(client.list_tools(), Err(McpError::NotInitialized)));
        assert!(matches!(
            client.call_tool("search_location", serde_json::json!({})),
            Err(McpError::NotInitialized)
        ));
        // Nothing was sent, so no id was consumed
        assert_eq!(client.request_id, 0);

        client.close().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_request_ids_start_at_one() {
        let mut client = McpClient::connect(McpServerConfig::new("cat", "cat")).unwrap();
        assert_eq!(client.next_request_id(), 1);
        assert_eq!(client.next_request_id(), 2);
        assert_eq!(client.next_request_id(), 3);
    }
}
