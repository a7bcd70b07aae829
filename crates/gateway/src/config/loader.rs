use std::path::Path;
use thiserror::Error;

use super::types::ApiConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("API key not set: environment variable {0} is missing or empty")]
    MissingApiKey(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Load API configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ApiConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<ApiConfig, ConfigError> {
    let config: ApiConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<ApiConfig, ConfigError> {
    let default_config = include_str!("api_config.json");
    load_config_from_str(default_config)
}

impl ApiConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be positive".into()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Read the API key from the configured environment variable
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey(self.api_key_env.clone())),
        }
    }
}
