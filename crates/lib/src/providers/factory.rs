//! # AI Provider Factory
//!
//! Builds the configured provider instance. Living in the library lets any
//! consumer (the server, tests, a future CLI) construct providers the same way.

use crate::{
    constants::{DEFAULT_GEMINI_MODEL, DEFAULT_UPSTREAM_TIMEOUT, GEMINI_GENERATE_URL},
    errors::RelayError,
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
};
use std::time::Duration;
use tracing::info;

/// Everything needed to construct one provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// `"gemini"` or `"local"`.
    pub provider: String,
    /// Required for `local`; derived from `model_name` for `gemini` when absent.
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub model_name: String,
    pub timeout: Duration,
    pub safety_threshold: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            api_url: None,
            api_key: None,
            model_name: DEFAULT_GEMINI_MODEL.to_string(),
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
            safety_threshold: None,
        }
    }
}

/// The `generateContent` URL for a Gemini model.
pub fn gemini_url_for(model_name: &str) -> String {
    GEMINI_GENERATE_URL.replace("{model}", model_name)
}

/// The model a local server is asked for. The Gemini default means nothing
/// was configured, so the server's own default applies.
fn local_model(model_name: &str) -> Option<String> {
    Some(model_name.trim())
        .filter(|m| !m.is_empty() && *m != DEFAULT_GEMINI_MODEL)
        .map(String::from)
}

/// Creates the provider described by `settings`.
pub fn create_provider(settings: &ProviderSettings) -> Result<Box<dyn AiProvider>, RelayError> {
    let provider: Box<dyn AiProvider> = match settings.provider.as_str() {
        "gemini" => {
            let api_key = settings
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .ok_or(RelayError::MissingApiKey)?;
            let api_url = settings
                .api_url
                .clone()
                .unwrap_or_else(|| gemini_url_for(&settings.model_name));
            info!(%api_url, timeout_ms = settings.timeout.as_millis() as u64, "Configuring Gemini provider");
            Box::new(
                GeminiProvider::new(api_url, api_key)?
                    .with_timeout(settings.timeout)
                    .with_safety_threshold(settings.safety_threshold.clone()),
            )
        }
        "local" => {
            let api_url = settings
                .api_url
                .clone()
                .ok_or_else(|| RelayError::MissingApiUrl("local".to_string()))?;
            let model = local_model(&settings.model_name);
            info!(%api_url, ?model, "Configuring local AI provider");
            Box::new(
                LocalAiProvider::new(api_url, settings.api_key.clone(), model)?
                    .with_timeout(settings.timeout),
            )
        }
        other => return Err(RelayError::UnsupportedProvider(other.to_string())),
    };
    Ok(provider)
}
