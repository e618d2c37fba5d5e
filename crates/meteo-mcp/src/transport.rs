//! Transport layer for MCP communication.
//!
//! Messages are newline-delimited JSON: one object per line, `\n`
//! terminated, flushed as soon as it is written. The framing functions are
//! generic over the stream so the server side and tests can reuse them.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::Serialize;

use crate::error::{McpError, Result};
use crate::protocol::{JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};

/// Encode a message as a single line and flush it.
pub fn write_message<W, T>(writer: &mut W, message: &T) -> Result<()>
where
    W: Write + ?Sized,
    T: Serialize + ?Sized,
{
    // serde_json never emits raw newlines, so one message is one line
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    writer.write_all(&line)?;
    writer.flush()?;

    tracing::trace!(
        bytes = line.len(),
        json = %String::from_utf8_lossy(&line[..line.len() - 1]),
        "sent MCP message"
    );

    Ok(())
}

/// Read and decode the next message.
///
/// Returns `Ok(None)` once the peer has closed the stream. Blank lines are
/// skipped. A line that is not a well-formed JSON-RPC message yields
/// [`McpError::Malformed`]; the stream stays usable afterwards.
pub fn read_message<R>(reader: &mut R) -> Result<Option<JsonRpcMessage>>
where
    R: BufRead + ?Sized,
{
    let mut bytes = Vec::new();
    loop {
        bytes.clear();
        if reader.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        if !bytes.iter().all(u8::is_ascii_whitespace) {
            break;
        }
    }

    let line = String::from_utf8(bytes).map_err(|e| {
        let lossy = String::from_utf8_lossy(e.as_bytes());
        McpError::malformed(lossy.trim(), e.utf8_error())
    })?;
    let raw = line.trim();
    tracing::trace!(json = %raw, "received MCP message");

    decode_line(raw).map(Some)
}

/// Decode one line into a validated message.
pub fn decode_line(line: &str) -> Result<JsonRpcMessage> {
    let message: JsonRpcMessage =
        serde_json::from_str(line).map_err(|e| McpError::malformed(line, e))?;
    message
        .validate()
        .map_err(|reason| McpError::malformed(line, reason))?;
    Ok(message)
}

/// Stdio transport to a spawned MCP server process.
pub struct McpTransport {
    /// The child process.
    child: Child,
    /// Buffered writer to stdin.
    stdin: BufWriter<ChildStdin>,
    /// Buffered reader from stdout.
    stdout: BufReader<ChildStdout>,
}

impl McpTransport {
    /// Spawn a new stdio transport.
    ///
    /// # Arguments
    /// * `command` - The command to spawn (e.g., "meteo-server")
    /// * `args` - Arguments to pass to the command
    /// * `env` - Optional environment variables to set
    pub fn spawn_stdio(
        command: &str,
        args: &[String],
        env: Option<&[(String, String)]>,
    ) -> Result<Self> {
        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit()); // server logs go to our stderr

        if let Some(env_vars) = env {
            for (key, value) in env_vars {
                cmd.env(key, value);
            }
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| McpError::spawn_failed(format!("failed to spawn '{}': {}", command, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| McpError::spawn_failed("failed to capture stdin"))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| McpError::spawn_failed("failed to capture stdout"))?;

        tracing::debug!(command, pid = child.id(), "spawned MCP server process");

        Ok(Self {
            child,
            stdin: BufWriter::new(stdin),
            stdout: BufReader::new(stdout),
        })
    }

    /// Send a JSON-RPC request and block for the next message, which must
    /// be its response.
    pub fn send_request(&mut self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        write_message(&mut self.stdin, request)?;

        match read_message(&mut self.stdout)? {
            None => Err(McpError::ConnectionClosed),
            Some(JsonRpcMessage::Response(response)) => Ok(response),
            Some(other) => Err(McpError::protocol(format!(
                "expected response to request {}, got a {}",
                request.id,
                other.kind()
            ))),
        }
    }

    /// Send a JSON-RPC notification (no response expected).
    pub fn send_notification(&mut self, notification: &JsonRpcNotification) -> Result<()> {
        write_message(&mut self.stdin, notification)
    }

    /// Terminate the server process and wait for it to exit.
    pub fn shutdown(&mut self) -> Result<()> {
        if matches!(self.child.try_wait(), Ok(Some(_))) {
            return Ok(());
        }
        if let Err(e) = self.child.kill() {
            // Already reaped between try_wait and kill
            if e.kind() != std::io::ErrorKind::InvalidInput {
                return Err(e.into());
            }
        }
        let status = self.child.wait()?;
        tracing::debug!(pid = self.child.id(), ?status, "MCP server process exited");
        Ok(())
    }

    /// Check if the server process is still running.
    pub fn is_connected(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for McpTransport {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
