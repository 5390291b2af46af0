use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::endpoint::DEFAULT_BASE_URL;
use crate::model::Units;

/// City used when neither the command line nor the config file names one.
pub const DEFAULT_CITY: &str = "London";

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "c6afdab6..."
/// city = "Reykjavik"
/// units = "imperial"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeatherMap APPID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default city for `show` when none is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Default unit system: "metric", "imperial", or "standard".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,

    /// Override for the API root, e.g. to use the TLS host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Config {
    /// Resolve the API key: environment variable first, then the stored
    /// value, otherwise an error telling the user how to fix it.
    pub fn api_key(&self) -> Result<String> {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    fn resolve_api_key(&self, env_key: Option<String>) -> Result<String> {
        if let Some(key) = env_key
            && !key.is_empty()
        {
            return Ok(key);
        }

        self.api_key.clone().ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `skyfetch configure` and enter your OpenWeatherMap API key,\n\
                 or set the {API_KEY_ENV} environment variable."
            )
        })
    }

    pub fn set_api_key(&mut self, key: String) {
        self.api_key = Some(key);
    }

    /// Effective city: explicit argument, then config file, then "London".
    pub fn city_or_default(&self, cli: Option<String>) -> String {
        cli.or_else(|| self.city.clone())
            .unwrap_or_else(|| DEFAULT_CITY.to_string())
    }

    /// Effective units: explicit argument, then config file, then metric.
    pub fn units_or_default(&self, cli: Option<Units>) -> Result<Units> {
        if let Some(units) = cli {
            return Ok(units);
        }

        match &self.units {
            Some(s) => Units::try_from(s.as_str())
                .with_context(|| format!("Invalid `units` value in config file: '{s}'")),
            None => Ok(Units::default()),
        }
    }

    /// Effective API root.
    pub fn base_url_or_default(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skyfetch", "skyfetch-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
