//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/playtape/config.toml)
//! 3. Environment variables (PLAYTAPE_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::store::LoadOptions;

/// Environment variable prefix
const ENV_PREFIX: &str = "PLAYTAPE";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Reject snapshots with duplicate IDs or playlists pointing at missing records
    #[serde(default)]
    pub strict_load: bool,

    /// Default log filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict_load: false,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (PLAYTAPE_STRICT_LOAD, PLAYTAPE_LOG)
    /// 2. Config file (~/.config/playtape/config.toml or PLAYTAPE_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // PLAYTAPE_STRICT_LOAD
        if let Ok(val) = std::env::var(format!("{}_STRICT_LOAD", ENV_PREFIX)) {
            self.strict_load = val.eq_ignore_ascii_case("true") || val == "1";
        }

        // PLAYTAPE_LOG
        if let Ok(val) = std::env::var(format!("{}_LOG", ENV_PREFIX)) {
            if !val.is_empty() {
                self.log_level = val;
            }
        }
    }

    /// Store checks matching this configuration
    pub fn load_options(&self) -> LoadOptions {
        if self.strict_load {
            LoadOptions::strict()
        } else {
            LoadOptions::default()
        }
    }

    /// Get the config file path
    ///
    /// Can be overridden with PLAYTAPE_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("playtape")
            .join("config.toml")
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
