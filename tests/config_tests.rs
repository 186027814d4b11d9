// Integration tests for configuration loading and validation

mod common;

use common::create_test_config;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use trade_dashboard::{Config, ConfigError, DashboardError};

#[test]
fn test_example_config_is_valid() {
    let config: Config = toml::from_str(include_str!("../dashboard.toml.example"))
        .expect("Failed to parse example config");

    assert!(config.validate().is_ok());
    assert_eq!(config.backend.base_url, "http://127.0.0.1:5000");
    assert_eq!(config.polling.price_interval(), Duration::from_secs(3));
    assert_eq!(config.polling.position_interval(), Duration::from_secs(10));
    assert_eq!(config.trading.default_strategy, "ma");
}

#[test]
fn test_config_file_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("dashboard.toml");

    let mut config = create_test_config("https://bot.example.com");
    config.polling.position_interval_secs = 15;
    config.trading.default_strategy = "combined".to_string();
    config.to_file(&config_path).expect("Failed to write config");

    let loaded = Config::from_file(&config_path).expect("Failed to load config");
    assert_eq!(loaded.backend.base_url, "https://bot.example.com");
    assert_eq!(loaded.polling.position_interval_secs, 15);
    assert_eq!(loaded.trading.default_strategy, "combined");
    assert!(!loaded.logging.log_price_ticks);
}

#[test]
fn test_load_or_create_writes_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("dashboard.toml");
    assert!(!config_path.exists());

    let created = Config::load_or_create(&config_path).expect("Failed to create config");
    assert!(config_path.exists());
    assert_eq!(created.polling.countdown_tick_secs, 1);

    let reloaded = Config::load_or_create(&config_path).expect("Failed to reload config");
    assert_eq!(reloaded.backend.base_url, created.backend.base_url);
}

#[test]
fn test_missing_file_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let err = Config::from_file(temp_dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(_)));

    // Surfaces with the init hint once converted
    let err: DashboardError = err.into();
    assert!(err.user_message().contains("dashboard init"));
}

#[test]
fn test_invalid_values_are_rejected_on_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let cases = [
        "[backend]\nbase_url = \"ftp://bot\"\n",
        "[backend]\nbase_url = \"http://bot\"\n[polling]\nprice_interval_secs = 0\n",
        "[backend]\nbase_url = \"http://bot\"\n[trading]\ndefault_strategy = \"grid\"\n",
    ];

    for (i, content) in cases.iter().enumerate() {
        let path = temp_dir.path().join(format!("bad_{}.toml", i));
        fs::write(&path, content).expect("Failed to write config file");
        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "case {}: {:?}", i, err);
    }
}

#[test]
fn test_malformed_toml_is_a_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "[backend\nbase_url = ").expect("Failed to write config file");

    assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse(_))));
}
