//! # Application Configuration
//!
//! This module defines the configuration structure for the `newsrelay-server`
//! and the logic for loading it from an optional `config.yml` file and
//! environment variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use newsrelay::{
    constants::{
        DEFAULT_GEMINI_MODEL, DEFAULT_MAX_RECORDS, DEFAULT_REQUEST_BUDGET, DEFAULT_UPSTREAM_TIMEOUT,
    },
    providers::factory::ProviderSettings,
};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::info;

/// Matches a `${VAR}` reference inside a config file.
static ENV_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").expect("env reference pattern is valid")
});

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
    /// Indicates the selected provider has no credential.
    MissingCredential(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
            ConfigError::MissingCredential(provider) => write!(
                f,
                "No API key configured for the '{provider}' provider. Set AI_API_KEY or GEMINI_API_KEY."
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// `"gemini"` or `"local"`. Loaded from `AI_PROVIDER` env var.
    #[serde(default = "default_ai_provider")]
    pub ai_provider: String,
    /// Derived from `model_name` for Gemini when absent.
    #[serde(default)]
    pub ai_api_url: Option<String>,
    #[serde(default)]
    pub ai_api_key: Option<String>,
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// The bound on a single upstream call, in milliseconds.
    #[serde(default = "default_upstream_timeout_ms")]
    pub upstream_timeout_ms: u64,
    /// The bound on all upstream calls for one request, in milliseconds.
    #[serde(default = "default_request_budget_ms")]
    pub request_budget_ms: u64,
    /// How many headlines are requested and returned.
    #[serde(default = "default_max_records")]
    pub max_records: usize,
    /// A Gemini safety threshold such as `BLOCK_ONLY_HIGH`.
    #[serde(default)]
    pub safety_threshold: Option<String>,
    /// A YAML file replacing the built-in fallback headlines.
    #[serde(default)]
    pub fallback_path: Option<String>,
    /// Honor `?debug=true` on the news routes. Off unless set.
    #[serde(default)]
    pub debug_responses: bool,
}

fn default_port() -> u16 {
    9090
}

fn default_ai_provider() -> String {
    "gemini".to_string()
}

fn default_model_name() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_upstream_timeout_ms() -> u64 {
    DEFAULT_UPSTREAM_TIMEOUT.as_millis() as u64
}

fn default_request_budget_ms() -> u64 {
    DEFAULT_REQUEST_BUDGET.as_millis() as u64
}

fn default_max_records() -> usize {
    DEFAULT_MAX_RECORDS
}

impl AppConfig {
    /// The provider settings this configuration describes.
    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            provider: self.ai_provider.clone(),
            api_url: self.ai_api_url.clone(),
            api_key: self.ai_api_key.clone(),
            model_name: self.model_name.clone(),
            timeout: Duration::from_millis(self.upstream_timeout_ms),
            safety_threshold: self.safety_threshold.clone(),
        }
    }
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let expanded_content = ENV_REFERENCE.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Treats an empty string (e.g. an unset `${VAR}`) as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Loads the application configuration from a file and environment variables.
///
/// - An explicit `config_path_override` must exist. Otherwise `config.yml` next
///   to the server crate is used if present.
/// - Top-level keys like `port` and `ai_api_key` are overridden by `PORT` and `AI_API_KEY`.
/// - Any key can be overridden by a `NEWSRELAY_...` variable (e.g. `NEWSRELAY_MAX_RECORDS`).
/// - `GEMINI_API_KEY` is used as the credential when no other key is set.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder();

    // Layer 1: YAML file (optional unless named explicitly)
    let file_content = match config_path_override {
        Some(path) => Some(read_and_substitute(path)?.ok_or_else(|| {
            ConfigError::NotFound(format!("Config file not found at '{path}'."))
        })?),
        None => {
            let user_config_path = format!("{base_path}/config.yml");
            let content = read_and_substitute(&user_config_path)?;
            if content.is_some() {
                info!("Loading user-defined configuration from '{user_config_path}'.");
            }
            content
        }
    };
    if let Some(content) = file_content {
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        // Layer 2: Load environment variables for top-level keys like PORT.
        .add_source(Environment::default().try_parsing(true))
        // Layer 3: Load prefixed environment variables for explicit overrides.
        .add_source(
            Environment::with_prefix("NEWSRELAY")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    config.ai_api_url = non_blank(config.ai_api_url.take());
    config.ai_api_key =
        non_blank(config.ai_api_key.take()).or_else(|| non_blank(env::var("GEMINI_API_KEY").ok()));
    config.safety_threshold = non_blank(config.safety_threshold.take());
    config.fallback_path = non_blank(config.fallback_path.take());

    if config.ai_provider == "gemini" && config.ai_api_key.is_none() {
        return Err(ConfigError::MissingCredential(config.ai_provider));
    }

    Ok(config)
}
