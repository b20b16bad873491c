use super::{bounded_call, AiProvider};
use crate::{
    constants::DEFAULT_UPSTREAM_TIMEOUT,
    errors::{ExtractionError, RelayError},
    types::{PromptSpec, RawUpstreamResult},
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;
use tracing::debug;

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct LocalAiRequest<'a> {
    messages: Vec<LocalAiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct LocalAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct LocalAiResponse {
    #[serde(default)]
    choices: Vec<LocalAiChoice>,
}

#[derive(Deserialize, Debug)]
struct LocalAiChoice {
    message: Option<LocalAiResponseMessage>,
}

#[derive(Deserialize, Debug)]
struct LocalAiResponseMessage {
    content: Option<String>,
}

// --- Local Provider implementation ---

/// A provider for interacting with a local or OpenAI-compatible API.
#[derive(Clone)]
pub struct LocalAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    model: Option<String>,
    timeout: Duration,
}

impl Debug for LocalAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalAiProvider")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl LocalAiProvider {
    /// Creates a new `LocalAiProvider`.
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        model: Option<String>,
    ) -> Result<Self, RelayError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(RelayError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
        })
    }

    /// Sets the bound on a single call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl AiProvider for LocalAiProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn invoke(&self, prompt: &PromptSpec) -> RawUpstreamResult {
        let request_body = LocalAiRequest {
            messages: vec![LocalAiMessage {
                role: "user",
                content: &prompt.instruction_text,
            }],
            model: self.model.as_deref(),
            temperature: prompt.randomness.clamp(0.0, 1.0),
            max_tokens: prompt.max_output_units,
            stream: false,
        };
        debug!(model = ?self.model, "--> Sending prompt to local AI provider");

        let exchange = async {
            let mut request_builder = self.client.post(&self.api_url);
            if let Some(key) = &self.api_key {
                request_builder = request_builder.bearer_auth(key);
            }
            let response = request_builder.json(&request_body).send().await?;
            let status = response.status().as_u16();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        bounded_call(self.name(), self.timeout, exchange).await
    }

    fn decode_envelope(&self, body: &str) -> Result<String, ExtractionError> {
        let envelope: LocalAiResponse = serde_json::from_str(body)
            .map_err(|e| ExtractionError::MalformedEnvelope(e.to_string()))?;

        envelope
            .choices
            .into_iter()
            .next()
            .ok_or(ExtractionError::MissingField("choices"))?
            .message
            .ok_or(ExtractionError::MissingField("choices[0].message"))?
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(ExtractionError::MissingField("choices[0].message.content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_message_content() {
        let provider = LocalAiProvider::new("http://localhost/v1".into(), None, None).unwrap();
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"[{\"title\":\"A\"}]"}}]}"#;
        assert_eq!(provider.decode_envelope(body).unwrap(), r#"[{"title":"A"}]"#);
        assert_eq!(
            provider.decode_envelope(r#"{"choices":[]}"#),
            Err(ExtractionError::MissingField("choices"))
        );
        assert_eq!(
            provider.decode_envelope(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(ExtractionError::MissingField("choices[0].message.content"))
        );
    }
}
