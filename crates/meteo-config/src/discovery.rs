//! Config file discovery and layered merging.
//!
//! Resolution order (later overrides earlier):
//! 1. `~/.config/meteo/config.toml` (user config)
//! 2. `./meteo.toml` (project-local)
//! 3. CLI arguments and environment (handled by the binaries)

use std::path::{Path, PathBuf};

use crate::{ConfigError, MeteoConfig, Result};

/// Default config filename for project-local config.
const PROJECT_CONFIG_FILE: &str = "meteo.toml";

/// Default config filename within the user config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Application name for XDG directory resolution.
const APP_NAME: &str = "meteo";

/// Environment variable to override the config directory.
pub const CONFIG_DIR_ENV: &str = "METEO_CONFIG_DIR";

/// Tracks where each config layer was loaded from.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the config file.
    pub path: PathBuf,
    /// Whether the file was found and loaded.
    pub loaded: bool,
}

/// Result of config discovery and loading.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The merged configuration.
    pub config: MeteoConfig,
    /// Sources that were checked, in order of precedence (lowest first).
    pub sources: Vec<ConfigSource>,
    /// Problems with files that exist but could not be used.
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Get paths of sources that were actually loaded.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }
}

/// Load configuration by discovering and merging all config layers.
///
/// `config_dir` overrides both `METEO_CONFIG_DIR` and the platform default.
/// `project_dir` is where `meteo.toml` is looked up (current directory when
/// `None`).
pub fn load_config(config_dir: Option<&Path>, project_dir: Option<&Path>) -> Result<LoadedConfig> {
    let mut config = MeteoConfig::new();
    let mut sources = Vec::new();
    let mut warnings = Vec::new();

    // 1. User config
    let user_config_path = match config_dir {
        Some(dir) => Some(dir.join(USER_CONFIG_FILE)),
        None => user_config_path(),
    };
    if let Some(path) = user_config_path {
        sources.push(load_layer(&mut config, &path, &mut warnings));
    }

    // 2. Project-local config
    let project_path = project_dir
        .map(|d| d.join(PROJECT_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));
    sources.push(load_layer(&mut config, &project_path, &mut warnings));

    Ok(LoadedConfig {
        config,
        sources,
        warnings,
    })
}

/// Load config from a specific file path (no discovery).
pub fn load_config_file(path: &Path) -> Result<MeteoConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    MeteoConfig::from_toml(&contents)
}

/// Path of the user config file.
pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// The meteo config directory.
///
/// Checks `METEO_CONFIG_DIR` first, then falls back to the platform default
/// (`~/.config/meteo` on Linux).
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Try to load a config file and merge it into the existing config.
fn load_layer(config: &mut MeteoConfig, path: &Path, warnings: &mut Vec<String>) -> ConfigSource {
    if !path.is_file() {
        return ConfigSource {
            path: path.to_path_buf(),
            loaded: false,
        };
    }

    match load_config_file(path) {
        Ok(layer) => {
            config.merge(layer);
            ConfigSource {
                path: path.to_path_buf(),
                loaded: true,
            }
        }
        Err(e) => {
            warnings.push(format!("Failed to load {}: {}", path.display(), e));
            ConfigSource {
                path: path.to_path_buf(),
                loaded: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_no_files_gives_defaults() {
        let user = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();

        let loaded = load_config(Some(user.path()), Some(project.path())).unwrap();
        assert_eq!(loaded.config, MeteoConfig::default());
        assert!(loaded.loaded_from().is_empty());
        assert_eq!(loaded.sources.len(), 2);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_project_overrides_user() {
        let user = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();

        fs::write(
            user.path().join("config.toml"),
            "[upstream]\ntimeout_secs = 10\n\n[server]\ncommand = \"/usr/bin/meteo-server\"\n",
        )
        .unwrap();
        fs::write(
            project.path().join("meteo.toml"),
            "[upstream]\ntimeout_secs = 3\n",
        )
        .unwrap();

        let loaded = load_config(Some(user.path()), Some(project.path())).unwrap();
        assert_eq!(loaded.loaded_from().len(), 2);
        assert_eq!(loaded.config.upstream().timeout_secs, 3);
        assert_eq!(loaded.config.server.unwrap().command, "/usr/bin/meteo-server");
    }

    #[test]
    fn test_invalid_file_becomes_warning() {
        let user = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        fs::write(user.path().join("config.toml"), "[upstream\nbroken").unwrap();

        let loaded = load_config(Some(user.path()), Some(project.path())).unwrap();
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("config.toml"));
        assert!(!loaded.sources[0].loaded);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
