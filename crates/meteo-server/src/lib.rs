//! Weather MCP server.
//!
//! [`ToolRegistry::weather`] wires the three weather tools to one
//! [`meteo_weather::WeatherApi`]; [`McpServer`] answers JSON-RPC requests
//! for them over any line-oriented reader/writer pair, normally the
//! process's stdin and stdout.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use meteo_server::{McpServer, ToolRegistry};
//! use meteo_weather::OpenMeteo;
//!
//! let api = Arc::new(OpenMeteo::builder().build()?);
//! let server = McpServer::new(ToolRegistry::weather(api));
//! server.serve(&mut std::io::stdin().lock(), &mut std::io::stdout().lock())?;
//! ```

pub mod server;
pub mod tools;

pub use server::{McpServer, SERVER_NAME};
pub use tools::{
    CurrentWeatherTool, DEFAULT_FORECAST_DAYS, ForecastTool, LOCATION_REQUIRED,
    SearchLocationTool, Tool, ToolRegistry,
};
