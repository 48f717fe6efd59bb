use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Currencies shown when none are given on the command line
    pub default_currencies: Vec<String>,
    pub log_path: PathBuf,
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            default_currencies: vec!["USD".to_string(), "EUR".to_string()],
            log_path: PathBuf::from("exchange_log.txt"),
            request_timeout_secs: 30,
            max_concurrent_requests: 1,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or the defaults when it doesn't exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("ua", "p24rates", "p24rates")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
