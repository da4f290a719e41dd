use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::provider::open_meteo::DEFAULT_BASE_URL;

/// A named coordinate pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn tokyo() -> Self {
        Self {
            name: "Tokyo".to_string(),
            latitude: 35.6892,
            longitude: 139.6917,
        }
    }

    /// Reject coordinates outside latitude [-90, 90] / longitude [-180, 180].
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(anyhow!(
                "Latitude {} of '{}' is out of range (-90..=90).",
                self.latitude,
                self.name
            ));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(anyhow!(
                "Longitude {} of '{}' is out of range (-180..=180).",
                self.longitude,
                self.name
            ));
        }
        Ok(())
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::tokyo()
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// base_url = "https://api.open-meteo.com/v1"
///
/// [default_location]
/// name = "Tokyo"
/// latitude = 35.6892
/// longitude = 139.6917
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Forecast API root; `/forecast` is appended.
    pub base_url: String,
    pub default_location: Location,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_location: Location::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.default_location.validate()?;
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
        let dirs = ProjectDirs::from("dev", "meteo", "meteo-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace the default location after validating it.
    pub fn set_default_location(&mut self, location: Location) -> Result<()> {
        location.validate()?;
        self.default_location = location;
        Ok(())
    }
}
