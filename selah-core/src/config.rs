//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/selah/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/selah/` (~/.config/selah/)
//! - Data: `$XDG_DATA_HOME/selah/` (~/.local/share/selah/)
//! - State/Logs: `$XDG_STATE_HOME/selah/` (~/.local/state/selah/)

use crate::error::{Error, Result};
use crate::insight::GeneratorConfig;
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Narrative-generator service configuration (optional; without it the
    /// synthesizer falls straight through to cache/static insights)
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/selah/config.toml` (~/.config/selah/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("selah").join("config.toml")
    }

    /// Returns the data directory path (for the insight cache)
    ///
    /// `$XDG_DATA_HOME/selah/` (~/.local/share/selah/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("selah")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/selah/` (~/.local/state/selah/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("selah")
    }

    /// Returns the insight-cache database path
    ///
    /// `$XDG_DATA_HOME/selah/insights.db` (~/.local/share/selah/insights.db)
    pub fn cache_path() -> PathBuf {
        Self::data_dir().join("insights.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/selah/selah.log` (~/.local/state/selah/selah.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("selah.log")
    }
}
