//! High-level weather client over an MCP server subprocess.
//!
//! Every lookup returns display text. Protocol failures are folded into that
//! text so a broken call never ends an interactive session.

use anyhow::{Context, Result};
use meteo_mcp::{McpClient, McpServerConfig, ServerInfo, ToolInfo};
use serde_json::{Value, json};

/// Tool names exposed by the weather server.
pub const CURRENT_WEATHER_TOOL: &str = "get_current_weather";
pub const FORECAST_TOOL: &str = "get_weather_forecast";
pub const SEARCH_LOCATION_TOOL: &str = "search_location";

/// Weather client bound to one running server.
pub struct WeatherClient {
    client: McpClient,
}

impl WeatherClient {
    /// Spawn the server and complete the initialize handshake.
    pub fn start(config: McpServerConfig) -> Result<Self> {
        let command = config.command.clone();
        let mut client = McpClient::connect(config)
            .with_context(|| format!("failed to start weather server '{command}'"))?;

        let info = client
            .initialize()
            .context("failed to initialize weather server")?;
        tracing::info!(server = %info.name, version = %info.version, "connected to weather server");

        Ok(Self { client })
    }

    /// Info reported by the server during initialize.
    pub fn server_info(&self) -> Option<&ServerInfo> {
        self.client.server_info()
    }

    /// Advertised tool descriptors.
    pub fn list_tools(&mut self) -> Result<Vec<ToolInfo>> {
        Ok(self.client.list_tools()?)
    }

    /// Advertised tool names; empty if listing fails.
    pub fn tool_names(&mut self) -> Vec<String> {
        match self.client.list_tools() {
            Ok(tools) => tools.into_iter().map(|t| t.name).collect(),
            Err(e) => {
                tracing::error!(error = %e, "error listing tools");
                Vec::new()
            }
        }
    }

    /// Current conditions text for a location.
    pub fn current_weather(&mut self, location: &str) -> String {
        match self.call_text(CURRENT_WEATHER_TOOL, json!({ "location": location })) {
            Ok(Some(text)) => text,
            Ok(None) => format!("No weather data available for {location}"),
            Err(e) => format!("Error getting weather for {location}: {e}"),
        }
    }

    /// Forecast text for a location.
    pub fn weather_forecast(&mut self, location: &str, days: i64) -> String {
        let args = json!({ "location": location, "days": days });
        match self.call_text(FORECAST_TOOL, args) {
            Ok(Some(text)) => text,
            Ok(None) => format!("No forecast data available for {location}"),
            Err(e) => format!("Error getting forecast for {location}: {e}"),
        }
    }

    /// Location search text.
    pub fn search_location(&mut self, location: &str) -> String {
        match self.call_text(SEARCH_LOCATION_TOOL, json!({ "location": location })) {
            Ok(Some(text)) => text,
            Ok(None) => format!("Location '{location}' not found"),
            Err(e) => format!("Error searching for {location}: {e}"),
        }
    }

    /// Stop the server process.
    pub fn close(&mut self) -> Result<()> {
        self.client.close()?;
        tracing::info!("weather server terminated");
        Ok(())
    }

    fn call_text(&mut self, tool: &str, arguments: Value) -> meteo_mcp::Result<Option<String>> {
        let result = self.client.call_tool(tool, arguments)?;
        Ok(result.first_text().map(str::to_string))
    }
}
