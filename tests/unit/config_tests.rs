use std::io::Write;
use std::path::PathBuf;

use focusflow::{config::GlobalConfig, AppError};

fn sample_toml() -> &'static str {
    r#"
http_port = 9100
db_path = "data/focusflow.db"
retention_days = 14

[planner]
lookahead_days = 5

[generative]
base_url = "http://localhost:8080/v1/chat/completions"
model = "local-model"
timeout_seconds = 3
temperature = 0.0
"#
}

#[test]
fn parses_valid_config() {
    let config = GlobalConfig::from_toml_str(sample_toml()).expect("config parses");

    assert_eq!(config.http_port, 9100);
    assert_eq!(config.db_path, PathBuf::from("data/focusflow.db"));
    assert_eq!(config.retention_days, 14);
    assert_eq!(config.planner.lookahead_days, 5);
    assert_eq!(config.generative.model, "local-model");
    assert_eq!(config.generative.timeout().as_secs(), 3);
    assert!(
        config.generative.api_key.is_none(),
        "api_key is not populated from TOML"
    );
}

#[test]
fn empty_config_uses_defaults() {
    let config = GlobalConfig::from_toml_str("").expect("defaults");

    assert_eq!(config.http_port, 8000);
    assert_eq!(config.db_path, PathBuf::from("focusflow.db"));
    assert_eq!(config.retention_days, 30);
    assert_eq!(config.planner.lookahead_days, 7);
    assert_eq!(config.generative.model, "gpt-4o-mini");
    assert_eq!(config.generative.timeout_seconds, 5);
    assert!(config.generative.base_url.starts_with("https://"));
}

#[test]
fn api_key_in_toml_is_ignored() {
    let config = GlobalConfig::from_toml_str(
        r#"
[generative]
api_key = "sk-should-not-load"
"#,
    );
    // Unknown-to-serde field is skipped, never loaded.
    let config = config.expect("parses");
    assert!(config.generative.api_key.is_none());
}

#[test]
fn zero_lookahead_is_rejected() {
    let err = GlobalConfig::from_toml_str("[planner]\nlookahead_days = 0\n").unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.contains("lookahead_days")));
}

#[test]
fn zero_timeout_is_rejected() {
    let err = GlobalConfig::from_toml_str("[generative]\ntimeout_seconds = 0\n").unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.contains("timeout_seconds")));
}

#[test]
fn blank_base_url_is_rejected() {
    let err = GlobalConfig::from_toml_str("[generative]\nbase_url = \" \"\n").unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.contains("base_url")));
}

#[test]
fn invalid_toml_is_config_error() {
    let err = GlobalConfig::from_toml_str("http_port = \"not a port\"").unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn load_from_path_reads_file() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(sample_toml().as_bytes()).expect("write");

    let config = GlobalConfig::load_from_path(file.path()).expect("load");
    assert_eq!(config.http_port, 9100);
}

#[test]
fn load_from_missing_path_fails() {
    let temp = tempfile::tempdir().expect("tempdir");
    let err = GlobalConfig::load_from_path(temp.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.contains("failed to read config")));
}
