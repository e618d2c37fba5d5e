//! Meteo - weather over MCP
//!
//! Main entry point for the Meteo CLI client.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod client;
mod commands;

use commands::{lookup, menu, selftest, tools};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Meteo - weather lookups through an MCP weather server
#[derive(Parser)]
#[command(name = "meteo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command that starts the weather server (default: meteo-server)
    #[arg(long, global = true, env = "METEO_SERVER")]
    pub server: Option<String>,

    /// Configuration directory (default: ~/.config/meteo)
    #[arg(long, global = true, env = "METEO_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive menu (the default)
    Menu(menu::MenuArgs),

    /// Run current, forecast and search against sample places
    Test(selftest::TestArgs),

    /// List the tools the server advertises
    Tools(tools::ToolsArgs),

    /// Current weather for a location
    Current(lookup::CurrentArgs),

    /// Daily forecast for a location
    Forecast(lookup::ForecastArgs),

    /// Resolve a location to coordinates
    Search(lookup::SearchArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = cli.config_dir.clone().or_else(meteo_config::config_dir);

    // Console (human-readable, stderr) + rotating JSON file
    let filter = if cli.verbose {
        "meteo=debug,meteo_mcp=debug,meteo_config=debug,info"
    } else {
        "meteo=warn,meteo_mcp=warn,warn"
    };

    let log_dir = config_dir
        .as_ref()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "meteo.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "meteo=trace,meteo_mcp=trace,meteo_config=debug,info",
                )),
        )
        .init();

    let loaded = meteo_config::load_config(cli.config_dir.as_deref(), None)?;
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }
    tracing::debug!(sources = ?loaded.loaded_from(), "loaded configuration");

    let ctx = commands::Context {
        server: commands::server_config(
            cli.server.as_deref(),
            &loaded.config,
            cli.config_dir.as_deref(),
        ),
        verbose: cli.verbose,
    };

    // Dispatch to command handlers
    match cli.command {
        None => menu::run(menu::MenuArgs::default(), &ctx),
        Some(Commands::Menu(args)) => menu::run(args, &ctx),
        Some(Commands::Test(args)) => selftest::run(args, &ctx),
        Some(Commands::Tools(args)) => tools::run(args, &ctx),
        Some(Commands::Current(args)) => lookup::run_current(args, &ctx),
        Some(Commands::Forecast(args)) => lookup::run_forecast(args, &ctx),
        Some(Commands::Search(args)) => lookup::run_search(args, &ctx),
    }
}
