//! Application configuration.
//!
//! Stored at `~/.config/lenddesk/config.json`. Environment variables (also
//! read from a `.env` file by the binary) take precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_USERS_URL;
use crate::listing::PageSize;

/// Application name used for config/data directory paths
const APP_NAME: &str = "lenddesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_API_URL: &str = "LENDDESK_API_URL";
pub const ENV_DATA_DIR: &str = "LENDDESK_DATA_DIR";
pub const ENV_EMAIL: &str = "LENDDESK_EMAIL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub api_url: Option<String>,
    pub last_email: Option<String>,
    pub page_size: Option<PageSize>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Where the persisted key-value files live.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = env_value(ENV_DATA_DIR) {
            return Ok(PathBuf::from(dir));
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("logs"))
    }

    /// Users endpoint: env override, then config file, then the default.
    pub fn api_url(&self) -> String {
        self.api_url_with(env_value(ENV_API_URL))
    }

    fn api_url_with(&self, env_override: Option<String>) -> String {
        env_override
            .or_else(|| self.api_url.clone().filter(|u| !u.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_USERS_URL.to_string())
    }

    /// Email to prefill the login form with.
    pub fn login_email(&self) -> Option<String> {
        env_value(ENV_EMAIL).or_else(|| self.last_email.clone())
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size.unwrap_or_default()
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
