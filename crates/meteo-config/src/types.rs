//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [upstream]               # Open-Meteo endpoints used by meteo-server
//! [server]                 # how the meteo client launches meteo-server
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Default Open-Meteo geocoding endpoint.
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Default Open-Meteo forecast endpoint.
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Default upstream request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default server command.
pub const DEFAULT_SERVER_COMMAND: &str = "meteo-server";

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g., project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteoConfig {
    /// Upstream weather API settings.
    pub upstream: Option<UpstreamConfig>,

    /// Server process settings.
    pub server: Option<ServerConfig>,
}

impl MeteoConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: MeteoConfig) {
        if other.upstream.is_some() {
            self.upstream = other.upstream;
        }

        if other.server.is_some() {
            self.server = other.server;
        }
    }

    /// Upstream settings, falling back to defaults.
    pub fn upstream(&self) -> UpstreamConfig {
        self.upstream.clone().unwrap_or_default()
    }

    fn validate(&self) -> Result<()> {
        if let Some(upstream) = &self.upstream
            && upstream.timeout_secs == 0
        {
            return Err(ConfigError::Invalid {
                field: "upstream.timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// Upstream weather API configuration (`[upstream]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Geocoding search endpoint.
    pub geocoding_url: String,
    /// Forecast endpoint.
    pub forecast_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl UpstreamConfig {
    /// Timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Server process configuration (`[server]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Command that starts the weather server.
    pub command: String,
    /// Extra arguments for the command.
    pub args: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_SERVER_COMMAND.to_string(),
            args: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = MeteoConfig::from_toml("").unwrap();
        assert_eq!(config, MeteoConfig::default());

        let upstream = config.upstream();
        assert_eq!(upstream.geocoding_url, DEFAULT_GEOCODING_URL);
        assert_eq!(upstream.forecast_url, DEFAULT_FORECAST_URL);
        assert_eq!(upstream.timeout(), Duration::from_secs(30));
        assert!(config.server.is_none());
        assert_eq!(ServerConfig::default().command, "meteo-server");
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let config = MeteoConfig::from_toml(
            r#"
            [upstream]
            timeout_secs = 5
            "#,
        )
        .unwrap();

        let upstream = config.upstream();
        assert_eq!(upstream.timeout_secs, 5);
        assert_eq!(upstream.forecast_url, DEFAULT_FORECAST_URL);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = MeteoConfig::from_toml("[upstream]\ntimeout_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("upstream.timeout_secs"));
    }

    #[test]
    fn test_merge_overrides_sections() {
        let mut base = MeteoConfig::from_toml(
            r#"
            [server]
            command = "/opt/meteo/bin/meteo-server"
            "#,
        )
        .unwrap();
        let overlay = MeteoConfig::from_toml(
            r#"
            [upstream]
            geocoding_url = "http://localhost:9000/search"
            "#,
        )
        .unwrap();

        base.merge(overlay);
        assert_eq!(base.server.as_ref().unwrap().command, "/opt/meteo/bin/meteo-server");
        assert_eq!(base.upstream().geocoding_url, "http://localhost:9000/search");
    }
}
