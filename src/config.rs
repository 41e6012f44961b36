//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::{AppError, Result};

/// Keychain service name used for stored credentials.
pub const KEYRING_SERVICE: &str = "focusflow";

/// Daily planner settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PlannerConfig {
    /// Look-ahead window, in days, for tasks considered by the daily plan.
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            lookahead_days: default_lookahead_days(),
        }
    }
}

/// Settings for the OpenAI-compatible generative text endpoint.
///
/// The API key is loaded at runtime via OS keychain or environment
/// variable, never from the TOML file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct GenerativeConfig {
    /// Chat completions endpoint URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Upper bound for a single generative call.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// API key (populated at runtime).
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_seconds: default_timeout_seconds(),
            temperature: default_temperature(),
            api_key: None,
        }
    }
}

impl GenerativeConfig {
    /// Timeout applied to each generative call.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_lookahead_days() -> u32 {
    7
}

fn default_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".into()
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

fn default_timeout_seconds() -> u64 {
    5
}

fn default_temperature() -> f32 {
    0.1
}

fn default_http_port() -> u16 {
    8000
}

fn default_db_path() -> PathBuf {
    PathBuf::from("focusflow.db")
}

fn default_retention_days() -> u32 {
    30
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// HTTP port for the API server.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// `SQLite` database file; `:memory:` keeps everything in RAM.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Days after which consumed reflections are purged.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Daily planner settings.
    #[serde(default)]
    pub planner: PlannerConfig,
    /// Generative text service settings.
    #[serde(default)]
    pub generative: GenerativeConfig,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the generative API key from OS keychain with env-var fallback.
    ///
    /// A missing key is not fatal: the server then runs with generative
    /// features disabled.
    pub async fn load_credentials(&mut self) {
        match load_credential("openai_api_key", "OPENAI_API_KEY").await {
            Ok(key) => self.generative.api_key = Some(key),
            Err(err) => {
                warn!(%err, "no generative api key; voice insights and smart capture fall back");
                self.generative.api_key = None;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.planner.lookahead_days == 0 {
            return Err(AppError::Config(
                "planner.lookahead_days must be greater than zero".into(),
            ));
        }

        if self.generative.timeout_seconds == 0 {
            return Err(AppError::Config(
                "generative.timeout_seconds must be greater than zero".into(),
            ));
        }

        if self.generative.base_url.trim().is_empty() {
            return Err(AppError::Config(
                "generative.base_url must not be empty".into(),
            ));
        }

        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
///
/// # Errors
///
/// Returns `AppError::Config` if neither the keychain nor `env_key`
/// provides a non-empty value.
pub async fn load_credential(keyring_key: &str, env_key: &str) -> Result<String> {
    let key = keyring_key.to_owned();

    // keyring is synchronous I/O.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            tracing::debug!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    match env::var(env_key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::Config(format!(
            "credential {keyring_key} not found in keychain or {env_key} env var"
        ))),
    }
}
