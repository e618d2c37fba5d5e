//! Configuration for the Meteo weather server and client.
//!
//! Provides TOML-based configuration with:
//! - Upstream endpoints and timeout for the weather server (`[upstream]`)
//! - How the client launches the server process (`[server]`)
//! - Config file layering (user config dir + project-local overrides)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    CONFIG_DIR_ENV, ConfigSource, LoadedConfig, config_dir, load_config, load_config_file,
    user_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
