// Configuration management for the trading dashboard

use crate::core::types::StrategyKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_price_interval")]
    pub price_interval_secs: u64,     // Price feed cadence
    #[serde(default = "default_position_interval")]
    pub position_interval_secs: u64,  // Position/lockout cadence
    #[serde(default = "default_countdown_tick")]
    pub countdown_tick_secs: u64,     // Lockout countdown granularity
    #[serde(default = "default_status_dismiss")]
    pub status_dismiss_ms: u64,       // Auto-dismiss for success/error banners
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_true")]
    pub log_price_ticks: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    #[serde(default = "default_strategy")]
    pub default_strategy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub trading: TradingConfig,
}

// Default value functions
fn default_base_url() -> String { "http://127.0.0.1:5000".to_string() }
fn default_price_interval() -> u64 { 3 }
fn default_position_interval() -> u64 { 10 }
fn default_countdown_tick() -> u64 { 1 }
fn default_status_dismiss() -> u64 { 3000 }
fn default_log_level() -> String { "info".to_string() }
fn default_true() -> bool { true }
fn default_strategy() -> String { "ma".to_string() }

impl Default for BackendConfig {
    fn default() -> Self {
        Self { base_url: default_base_url() }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            price_interval_secs: default_price_interval(),
            position_interval_secs: default_position_interval(),
            countdown_tick_secs: default_countdown_tick(),
            status_dismiss_ms: default_status_dismiss(),
        }
    }
}

impl PollingConfig {
    pub fn price_interval(&self) -> Duration {
        Duration::from_secs(self.price_interval_secs)
    }

    pub fn position_interval(&self) -> Duration {
        Duration::from_secs(self.position_interval_secs)
    }

    pub fn countdown_tick(&self) -> Duration {
        Duration::from_secs(self.countdown_tick_secs)
    }

    pub fn status_dismiss(&self) -> Duration {
        Duration::from_millis(self.status_dismiss_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_price_ticks: true,
        }
    }
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self { default_strategy: default_strategy() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            polling: PollingConfig::default(),
            logging: LoggingConfig::default(),
            trading: TradingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// Load configuration from file, or create default if file doesn't exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            let config = Self::default();
            config.to_file(&path)?;
            info!("📁 Created default config file: {}", path.as_ref().display());
            Ok(config)
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.backend.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Validation("backend.base_url must not be empty".to_string()));
        }

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "backend.base_url must start with http:// or https://".to_string()
            ));
        }

        if self.polling.price_interval_secs == 0 {
            return Err(ConfigError::Validation("price_interval_secs must be greater than 0".to_string()));
        }

        if self.polling.position_interval_secs == 0 {
            return Err(ConfigError::Validation("position_interval_secs must be greater than 0".to_string()));
        }

        if self.polling.countdown_tick_secs == 0 {
            return Err(ConfigError::Validation("countdown_tick_secs must be greater than 0".to_string()));
        }

        if self.trading.default_strategy.parse::<StrategyKind>().is_err() {
            return Err(ConfigError::Validation(format!(
                "unknown default_strategy '{}'",
                self.trading.default_strategy
            )));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    FileRead(String),

    #[error("Failed to write config file: {0}")]
    FileWrite(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_dashboard_cadence() {
        let config = Config::default();
        assert_eq!(config.polling.price_interval(), Duration::from_secs(3));
        assert_eq!(config.polling.position_interval(), Duration::from_secs(10));
        assert_eq!(config.polling.countdown_tick(), Duration::from_secs(1));
        assert_eq!(config.polling.status_dismiss(), Duration::from_millis(3000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[backend]\nbase_url = \"http://localhost:8080\"\n").unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:8080");
        assert_eq!(config.polling.position_interval_secs, 10);
        assert_eq!(config.trading.default_strategy, "ma");
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut config = Config::default();
        config.polling.price_interval_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_rejects_unknown_strategy() {
        let mut config = Config::default();
        config.trading.default_strategy = "martingale".to_string();
        assert!(config.validate().is_err());
    }
}
