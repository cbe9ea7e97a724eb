//! Configuration loading and filesystem path helpers.
//!
//! hyprlight keeps its configuration in `~/.config/hyprlight/config.toml`.
//! The file holds the two API keys used by the resolvers; both are optional,
//! and without them the tool still runs with time-of-day-only selection.
//!
//! ```toml
//! openweather_api_key = "..."      # https://openweathermap.org/api
//! ipgeolocation_api_key = "..."    # https://ipgeolocation.io
//! ```
//!
//! On first run a commented template is written so the user has a file to
//! edit. The same directory also holds the persisted mode state
//! (`state.json`) and the resolver caches (`cache/`).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::logger::Log;

/// User configuration: API keys for the two outbound services.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// OpenWeatherMap API key. Without it weather-aware selection is
    /// disabled and the cached/last-known weather is used instead.
    pub openweather_api_key: Option<String>,
    /// ipgeolocation.io API key. Without it the location falls back to the
    /// disk cache and finally to fixed coordinates.
    pub ipgeolocation_api_key: Option<String>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# hyprlight configuration
#
# Both services offer free tiers:
#   openweather_api_key    - https://openweathermap.org/api
#   ipgeolocation_api_key  - https://ipgeolocation.io
#
# Without keys hyprlight still runs, selecting temperatures from the time
# of day alone.

openweather_api_key = ""
ipgeolocation_api_key = ""
"#;

impl Config {
    /// Load the configuration from the default location.
    ///
    /// A missing file is created from the commented template and an empty
    /// configuration is returned, so a fresh install runs without manual
    /// setup.
    pub fn load() -> Result<Self> {
        let path = config_file_path()?;

        if !path.exists() {
            Self::create_default(&path)?;
            Log::log_warning(&format!(
                "Created default configuration at {}",
                path.display()
            ));
            Log::log_indented("Add your API keys there to enable weather-aware selection");
            return Ok(Self::default());
        }

        Self::load_from_path(&path)
    }

    /// Load the configuration from a specific path (used by tests).
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.normalize();

        Ok(config)
    }

    fn create_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, DEFAULT_CONFIG_TEMPLATE)
            .with_context(|| format!("Failed to write default config: {}", path.display()))
    }

    // Empty strings in the file mean "not configured"
    fn normalize(&mut self) {
        for key in [&mut self.openweather_api_key, &mut self.ipgeolocation_api_key] {
            if key.as_deref().is_some_and(|k| k.trim().is_empty()) {
                *key = None;
            }
        }
    }
}

/// Base directory for configuration, state, and caches.
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine the user configuration directory"))?;
    Ok(base.join("hyprlight"))
}

/// Path of the TOML configuration file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Path of the persisted mode state file.
pub fn state_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("state.json"))
}

/// Directory holding the resolver caches.
pub fn cache_dir() -> Result<PathBuf> {
    Ok(config_dir()?.join("cache"))
}
