//! Meteo weather server
//!
//! Speaks newline-delimited JSON-RPC (MCP) on stdin/stdout. Logs go to
//! stderr only; stdout carries nothing but protocol messages.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use meteo_server::{McpServer, ToolRegistry};
use meteo_weather::OpenMeteo;

/// Meteo weather server - MCP tools over stdio
#[derive(Parser, Debug)]
#[command(name = "meteo-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Geocoding search endpoint
    #[arg(long, env = "METEO_GEOCODING_URL")]
    geocoding_url: Option<String>,

    /// Forecast endpoint
    #[arg(long, env = "METEO_FORECAST_URL")]
    forecast_url: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Configuration directory (default: ~/.config/meteo)
    #[arg(long, env = "METEO_CONFIG_DIR")]
    config_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "meteo_server=debug,meteo_weather=debug,meteo_mcp=debug,info"
    } else {
        "meteo_server=info,meteo_weather=info,warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    let loaded = meteo_config::load_config(args.config_dir.as_deref(), None)?;
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }

    let mut upstream = loaded.config.upstream();
    if let Some(url) = args.geocoding_url {
        upstream.geocoding_url = url;
    }
    if let Some(url) = args.forecast_url {
        upstream.forecast_url = url;
    }
    if let Some(secs) = args.timeout_secs {
        upstream.timeout_secs = secs;
    }

    let api = OpenMeteo::from_config(&upstream).context("invalid upstream configuration")?;
    tracing::info!(
        geocoding = %api.geocoding_url(),
        forecast = %api.forecast_url(),
        "weather server starting"
    );

    let server = McpServer::new(ToolRegistry::weather(Arc::new(api)));

    let stdin = io::stdin();
    let stdout = io::stdout();
    server.serve(&mut stdin.lock(), &mut stdout.lock())?;

    Ok(())
}
