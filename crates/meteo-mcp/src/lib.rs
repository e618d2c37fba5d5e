//! MCP (Model Context Protocol) plumbing for Meteo.
//!
//! This crate holds the wire types, the newline-delimited framing shared by
//! both processes, and a client that drives an MCP server subprocess.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  McpClient                                                  │
//! │  - Spawns the server, owns the request-ID counter           │
//! │  - Implements initialize, tools/list, tools/call            │
//! └─────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  McpTransport / write_message / read_message                │
//! │  - JSON-RPC 2.0, one JSON object per line                   │
//! │  - Stdio transport (spawn child process)                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use meteo_mcp::{McpClient, McpServerConfig};
//! use serde_json::json;
//!
//! let mut client = McpClient::connect(McpServerConfig::new("weather", "meteo-server"))?;
//! let server_info = client.initialize()?;
//! println!("Connected to: {} v{}", server_info.name, server_info.version);
//!
//! for tool in client.list_tools()? {
//!     println!("Tool: {} - {:?}", tool.name, tool.description);
//! }
//!
//! let result = client.call_tool("search_location", json!({"location": "Tokyo"}))?;
//! println!("{}", result.text().unwrap_or_default());
//! client.close()?;
//! ```
//!
//! # Wire format
//!
//! ```text
//! {"jsonrpc":"2.0","id":1,"method":"initialize","params":{...}}\n
//! {"jsonrpc":"2.0","id":1,"result":{...}}\n
//! {"jsonrpc":"2.0","method":"notifications/initialized"}\n
//! ```
//!
//! The protocol flow is:
//! 1. Client sends `initialize` with capabilities
//! 2. Server responds with its capabilities
//! 3. Client sends `notifications/initialized`
//! 4. Client can now call `tools/list` and `tools/call`

pub mod client;
pub mod error;
pub mod protocol;
pub mod transport;

// Re-export main types
pub use client::{McpClient, McpServerConfig};
pub use error::{McpError, Result};
pub use protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, ListToolsResult,
    MCP_PROTOCOL_VERSION, ServerCapabilities, ServerInfo, ToolContent, ToolInfo, ToolsCapability,
    methods,
};
pub use transport::{McpTransport, read_message, write_message};
