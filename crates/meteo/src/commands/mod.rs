//! CLI command handlers.

use std::path::{Path, PathBuf};

use anyhow::Result;
use meteo_config::{DEFAULT_SERVER_COMMAND, MeteoConfig};
use meteo_mcp::McpServerConfig;

use crate::client::WeatherClient;

pub mod lookup;
pub mod menu;
pub mod selftest;
pub mod tools;

/// Name of the server binary installed next to `meteo`.
const SERVER_BINARY: &str = "meteo-server";

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// How to launch the weather server.
    pub server: McpServerConfig,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Start the server and return a connected client.
    pub fn connect(&self) -> Result<WeatherClient> {
        tracing::debug!(command = %self.server.command, args = ?self.server.args, "starting weather server");
        WeatherClient::start(self.server.clone())
    }
}

/// Decide how to launch the server.
///
/// Precedence: `--server`/`METEO_SERVER`, then an explicit `[server]`
/// section, then a `meteo-server` binary beside this executable, then
/// `meteo-server` on `PATH`.
pub fn server_config(
    flag: Option<&str>,
    config: &MeteoConfig,
    config_dir: Option<&Path>,
) -> McpServerConfig {
    let (command, args) = match (flag, &config.server) {
        (Some(command), _) => (command.to_string(), Vec::new()),
        (None, Some(section)) => (section.command.clone(), section.args.clone()),
        (None, None) => (
            sibling_server()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| DEFAULT_SERVER_COMMAND.to_string()),
            Vec::new(),
        ),
    };

    let mut server = McpServerConfig::new("weather", command).with_args(args);
    if let Some(dir) = config_dir {
        server = server.with_env_var(meteo_config::CONFIG_DIR_ENV, dir.display().to_string());
    }
    server
}

fn sibling_server() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let candidate = exe
        .parent()?
        .join(format!("{SERVER_BINARY}{}", std::env::consts::EXE_SUFFIX));
    candidate.is_file().then_some(candidate)
}
