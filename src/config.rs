use crate::chatbot::FailurePolicy;
use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_BOT_LABEL, DEFAULT_INITIALIZE_TIMEOUT_SECS, DEFAULT_TIME_FORMAT,
    DEFAULT_USER_LABEL,
};
use crate::errors::{ChatError, ChatResult};
use chrono::format::{Item, StrftimeItems};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, path::PathBuf, str::FromStr, time::Duration};

const APP_DIR: &str = "premchat";
pub const BASE_URL_ENV: &str = "PREMCHAT_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub initialize_timeout_secs: u64,
    pub failure_policy: FailurePolicy,
    pub user_label: String,
    pub bot_label: String,
    pub time_format: String,
    pub storage_path: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            initialize_timeout_secs: DEFAULT_INITIALIZE_TIMEOUT_SECS,
            failure_policy: FailurePolicy::Swallow,
            user_label: DEFAULT_USER_LABEL.to_string(),
            bot_label: DEFAULT_BOT_LABEL.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            storage_path: None,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    pub fn initialize_timeout(&self) -> Duration {
        Duration::from_secs(self.initialize_timeout_secs)
    }

    pub fn storage_path(&self) -> ChatResult<PathBuf> {
        match &self.storage_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("storage.json")),
        }
    }

    pub fn log_dir(&self) -> ChatResult<PathBuf> {
        match &self.log_dir {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("logs")),
        }
    }

    /// Applies environment overrides on top of the file values.
    pub fn apply_env(&mut self) {
        if let Ok(url) = env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.base_url = url.trim().to_string();
            }
        }
    }
}

/// Loads the config from the platform config dir, writing defaults on first run.
pub fn load_config() -> ChatResult<Config> {
    let mut config = load_config_from(&get_config_path()?)?;
    config.apply_env();
    validate_config(&config)?;
    Ok(config)
}

pub fn load_config_from(config_path: &Path) -> ChatResult<Config> {
    // If config exists, load it
    if config_path.exists() {
        let config_str = fs::read_to_string(config_path).map_err(|e| {
            ChatError::config_error(format!("Failed to read config file: {}", e))
        })?;

        let config: Config = serde_json::from_str(&config_str)
            .map_err(|e| ChatError::config_error(format!("Failed to parse config: {}", e)))?;

        validate_config(&config)?;
        Ok(config)
    } else {
        let config = Config::default();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ChatError::config_error(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config_str = serde_json::to_string_pretty(&config).map_err(|e| {
            ChatError::config_error(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(config_path, config_str).map_err(|e| {
            ChatError::config_error(format!("Failed to write config file: {}", e))
        })?;

        Ok(config)
    }
}

fn get_config_path() -> ChatResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ChatError::config_error("Could not determine config directory"))?;

    Ok(config_dir.join(APP_DIR).join("config.json"))
}

fn data_dir() -> ChatResult<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| ChatError::config_error("Could not determine data directory"))?;

    Ok(data_dir.join(APP_DIR))
}

pub fn validate_config(config: &Config) -> ChatResult<()> {
    if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
        return Err(ChatError::config_error(format!(
            "base_url must be an http(s) URL, got '{}'",
            config.base_url
        )));
    }

    if config.initialize_timeout_secs == 0 {
        return Err(ChatError::config_error(
            "initialize_timeout_secs must be greater than 0",
        ));
    }

    if config.user_label.trim().is_empty() || config.bot_label.trim().is_empty() {
        return Err(ChatError::config_error("Sender labels must not be empty"));
    }

    if config.time_format.is_empty()
        || StrftimeItems::new(&config.time_format).any(|item| matches!(item, Item::Error))
    {
        return Err(ChatError::config_error(format!(
            "Invalid time_format '{}'",
            config.time_format
        )));
    }

    if LevelFilter::from_str(&config.log_level).is_err() {
        return Err(ChatError::config_error(format!(
            "Unknown log_level '{}'",
            config.log_level
        )));
    }

    Ok(())
}
