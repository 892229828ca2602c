use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::network::DEFAULT_BACKEND_URL;

pub const DEFAULT_CONFIG_PATH: &str = "config/caregiver.json";

/// Location reported by the "Send SOS (simulate)" action.
pub const SIMULATED_LAT: f64 = 12.9716;
pub const SIMULATED_LON: f64 = 77.5946;
pub const SIMULATED_NOTE: &str = "Simulated SOS from watch";
pub const DEFAULT_USER_ID: &str = "user_deaf_1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot write config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot encode config: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub read_timeout_secs: u64,
    pub read_attempts: u32,
    pub retry_backoff_ms: u64,
    pub default_sender_id: String,
    pub default_user_id: String,
    pub simulated_lat: f64,
    pub simulated_lon: f64,
    pub simulated_note: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            read_timeout_secs: 5,
            read_attempts: 3,
            retry_backoff_ms: 250,
            default_sender_id: DEFAULT_USER_ID.to_string(),
            default_user_id: DEFAULT_USER_ID.to_string(),
            simulated_lat: SIMULATED_LAT,
            simulated_lon: SIMULATED_LON,
            simulated_note: SIMULATED_NOTE.to_string(),
        }
    }
}

/// Reads the config file, falling back to defaults when it is missing or
/// malformed.
pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    log::info!("Saved settings to {path}");
    Ok(())
}
