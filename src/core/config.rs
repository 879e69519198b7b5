use crate::core::analytics::AggregationMode;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

const DATA_FILE_NAME: &str = "balance_data.json";

fn default_balance_window_days() -> u32 {
    30
}

fn default_recent_payment_days() -> u32 {
    7
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Location of the JSON data file. Defaults to the platform data directory.
    #[serde(default)]
    pub data_path: Option<String>,
    #[serde(default)]
    pub mode: AggregationMode,
    /// Days covered by `balance` when no start date is given.
    #[serde(default = "default_balance_window_days")]
    pub balance_window_days: u32,
    /// Days of payment history shown by `payments`.
    #[serde(default = "default_recent_payment_days")]
    pub recent_payment_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_path: None,
            mode: AggregationMode::default(),
            balance_window_days: default_balance_window_days(),
            recent_payment_days: default_recent_payment_days(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "caja").context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn data_file_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs =
            ProjectDirs::from("", "", "caja").context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().join(DATA_FILE_NAME))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        // An empty file is a valid config with every default applied
        if config_str.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
