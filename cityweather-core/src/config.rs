use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}, time::Duration};

use crate::{
    model::DEFAULT_FORECAST_DAYS,
    provider::open_meteo::{DEFAULT_LANGUAGE, FORECAST_URL, GEOCODING_URL},
};

/// Open-Meteo serves at most this many forecast days.
pub const MAX_FORECAST_DAYS: u8 = 16;

pub const DEFAULT_STARTUP_CITIES: &[&str] =
    &["São Paulo", "Rio de Janeiro", "Curitiba", "Salvador", "Porto Alegre"];

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// language = "pt"
/// forecast_days = 7
/// batch_pause_ms = 200
/// startup_cities = ["São Paulo", "Curitiba"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language for geocoding results.
    pub language: String,
    pub geocoding_url: String,
    pub forecast_url: String,
    pub forecast_days: u8,
    pub request_timeout_secs: u64,
    /// Minimum spacing between cities in a batch; 0 disables pacing.
    pub batch_pause_ms: u64,
    /// Cities loaded by `batch` when none are given.
    pub startup_cities: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            geocoding_url: GEOCODING_URL.to_string(),
            forecast_url: FORECAST_URL.to_string(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            request_timeout_secs: 10,
            batch_pause_ms: 200,
            startup_cities: DEFAULT_STARTUP_CITIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn batch_pause(&self) -> Duration {
        Duration::from_millis(self.batch_pause_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_FORECAST_DAYS).contains(&self.forecast_days) {
            bail!(
                "forecast_days must be between 1 and {MAX_FORECAST_DAYS}, got {}",
                self.forecast_days
            );
        }
        if self.geocoding_url.trim().is_empty() || self.forecast_url.trim().is_empty() {
            bail!("geocoding_url and forecast_url must not be empty");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "cityweather", "cityweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
