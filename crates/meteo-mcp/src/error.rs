//! Error types for MCP operations.

use thiserror::Error;

/// Result type for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;

/// Protocol-level failures.
///
/// These abort the current operation and are never retried internally.
/// Application failures (unknown location, upstream outage) never show up
/// here; the server reports them as text inside a successful response.
#[derive(Debug, Error)]
pub enum McpError {
    /// Failed to spawn the MCP server process.
    #[error("failed to spawn MCP server: {0}")]
    SpawnFailed(String),

    /// JSON-RPC protocol violation (wrong message kind, id mismatch).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A line that could not be decoded as a JSON-RPC message.
    #[error("invalid message: {reason} (line: {line})")]
    Malformed {
        /// The raw offending line, without its terminator.
        line: String,
        /// Decoder error description.
        reason: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server returned an error response.
    #[error("server error {code}: {message}")]
    ServerError {
        /// Error code from the server.
        code: i64,
        /// Error message from the server.
        message: String,
        /// Optional additional data.
        data: Option<serde_json::Value>,
    },

    /// Connection not started: `initialize()` has not completed.
    #[error("server not initialized - call initialize() first")]
    NotInitialized,

    /// Connection closed.
    #[error("connection closed")]
    ConnectionClosed,
}

impl McpError {
    /// Create a spawn failed error.
    pub fn spawn_failed(msg: impl Into<String>) -> Self {
        Self::SpawnFailed(msg.into())
    }

    /// Create a protocol error.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a malformed message error.
    pub fn malformed(line: impl Into<String>, reason: impl ToString) -> Self {
        Self::Malformed {
            line: line.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a server error from an error response.
    pub fn server_error(
        code: i64,
        message: impl Into<String>,
        data: Option<serde_json::Value>,
    ) -> Self {
        Self::ServerError {
            code,
            message: message.into(),
            data,
        }
    }

    /// Whether the peer went away (closed stream or dead process).
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::ConnectionClosed)
            || matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = McpError::spawn_failed("command not found");
        assert!(err.to_string().contains("spawn"));
        assert!(err.to_string().contains("command not found"));

        let err = McpError::server_error(-32601, "Method not found: bogus", None);
        assert!(err.to_string().contains("-32601"));
        assert!(err.to_string().contains("Method not found: bogus"));
    }

    #[test]
    fn test_malformed_keeps_raw_line() {
        let err = McpError::malformed("{not json", "expected value");
        let text = err.to_string();
        assert!(text.contains("{not json"));
        assert!(text.contains("expected value"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let mcp_err: McpError = json_err.into();
        assert!(matches!(mcp_err, McpError::Json(_)));
    }

    #[test]
    fn test_disconnect_detection() {
        assert!(McpError::ConnectionClosed.is_disconnect());
        let pipe = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        assert!(McpError::from(pipe).is_disconnect());
        assert!(!McpError::NotInitialized.is_disconnect());
    }
}
