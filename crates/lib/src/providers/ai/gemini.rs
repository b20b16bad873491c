use super::{bounded_call, AiProvider};
use crate::{
    constants::DEFAULT_UPSTREAM_TIMEOUT,
    errors::{ExtractionError, RelayError},
    types::{PromptSpec, RawUpstreamResult, StructuralHint},
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Debug;
use std::time::Duration;
use tracing::debug;

/// The header Gemini reads the API key from.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// The harm categories a configured safety threshold is applied to.
const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

// --- Gemini-specific request and response structures ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Serialize)]
struct SafetySetting<'a> {
    category: &'static str,
    threshold: &'a str,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize, Debug)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize, Debug)]
struct PartResponse {
    text: Option<String>,
}

/// The Gemini `responseSchema` for a [`StructuralHint`].
fn response_schema(hint: StructuralHint) -> Value {
    match hint {
        StructuralHint::ArticleArray => json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "title": { "type": "STRING" },
                    "source": { "type": "STRING" },
                    "description": { "type": "STRING" },
                    "url": { "type": "STRING" },
                    "image": { "type": "STRING" }
                },
                "required": ["title", "source", "description"]
            }
        }),
    }
}

// --- Gemini Provider implementation ---

/// A provider for interacting with the Google Gemini API.
#[derive(Clone)]
pub struct GeminiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
    timeout: Duration,
    safety_threshold: Option<String>,
}

impl Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("safety_threshold", &self.safety_threshold)
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider`. A blank key is rejected.
    pub fn new(api_url: String, api_key: String) -> Result<Self, RelayError> {
        if api_key.trim().is_empty() {
            return Err(RelayError::MissingApiKey);
        }
        let client = ReqwestClient::builder()
            .build()
            .map_err(RelayError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
            safety_threshold: None,
        })
    }

    /// Sets the bound on a single call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Applies `threshold` (e.g. `"BLOCK_ONLY_HIGH"`) to every harm category.
    pub fn with_safety_threshold(mut self, threshold: Option<String>) -> Self {
        self.safety_threshold = threshold;
        self
    }

    fn request_body<'a>(&'a self, prompt: &'a PromptSpec) -> GeminiRequest<'a> {
        let safety_settings = self
            .safety_threshold
            .as_deref()
            .map(|threshold| {
                HARM_CATEGORIES
                    .into_iter()
                    .map(|category| SafetySetting {
                        category,
                        threshold,
                    })
                    .collect()
            })
            .unwrap_or_default();

        GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: &prompt.instruction_text,
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: prompt.max_output_units,
                temperature: prompt.randomness.clamp(0.0, 1.0),
                response_mime_type: "application/json",
                response_schema: prompt.structural_hint.map(response_schema),
            },
            safety_settings,
        }
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn invoke(&self, prompt: &PromptSpec) -> RawUpstreamResult {
        let body = self.request_body(prompt);
        debug!(
            max_output_tokens = prompt.max_output_units,
            temperature = prompt.randomness,
            "--> Sending prompt to Gemini"
        );

        let exchange = async {
            let response = self
                .client
                .post(&self.api_url)
                .header(API_KEY_HEADER, &self.api_key)
                .json(&body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        let result = bounded_call(self.name(), self.timeout, exchange).await;
        debug!(status = result.http_status, "<-- Gemini responded");
        result
    }

    fn decode_envelope(&self, body: &str) -> Result<String, ExtractionError> {
        let envelope: GeminiResponse = serde_json::from_str(body)
            .map_err(|e| ExtractionError::MalformedEnvelope(e.to_string()))?;

        let candidate = envelope
            .candidates
            .into_iter()
            .next()
            .ok_or(ExtractionError::MissingField("candidates"))?;
        let content = candidate
            .content
            .ok_or(ExtractionError::MissingField("candidates[0].content"))?;

        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            return Err(ExtractionError::MissingField(
                "candidates[0].content.parts[].text",
            ));
        }
        Ok(text)
    }
}
