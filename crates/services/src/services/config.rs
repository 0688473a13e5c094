use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

use crate::services::breed::CAT_API_URL;

pub const CONFIG_VERSION: &str = "v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub config_version: String,
    /// Endpoint returning the full breed catalog as a JSON array.
    #[serde(default = "default_cat_api_url")]
    pub cat_api_url: String,
}

fn default_cat_api_url() -> String {
    CAT_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: CONFIG_VERSION.to_string(),
            cat_api_url: default_cat_api_url(),
        }
    }
}

impl From<String> for Config {
    fn from(raw_config: String) -> Self {
        if let Ok(config) = serde_json::from_str::<Config>(&raw_config)
            && config.config_version == CONFIG_VERSION
        {
            return config;
        }

        tracing::warn!("Config missing, unreadable or from an unknown version; using defaults");
        Self::default()
    }
}

pub async fn load_config_from_file(path: &Path) -> Config {
    match fs::read_to_string(path).await {
        Ok(raw) => Config::from(raw),
        Err(_) => Config::default(),
    }
}

pub async fn save_config_to_file(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let raw = serde_json::to_string_pretty(config)?;
    fs::write(path, raw).await?;
    Ok(())
}
