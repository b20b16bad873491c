use newsrelay::{Category, GenerationRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize, Default)]
pub struct DebugParams {
    pub debug: Option<String>,
}

impl DebugParams {
    /// `?debug=true` or `?debug=1`. Any other value is ignored.
    pub fn enabled(&self) -> bool {
        matches!(self.debug.as_deref(), Some("true") | Some("1"))
    }
}

#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
    pub result: T,
}

/// A request for headlines, in either of the shapes clients send.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NewsRequest {
    /// The browser client's Gemini-shaped body. The topic is detected from the
    /// prompt text.
    Legacy { contents: Vec<LegacyContent> },
    Direct(DirectNewsRequest),
}

#[derive(Debug, Deserialize, Default)]
pub struct DirectNewsRequest {
    #[serde(default, alias = "category")]
    pub topic: Option<String>,
    #[serde(default, alias = "explicitSource", alias = "explicit_source")]
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LegacyContent {
    #[serde(default)]
    pub parts: Vec<LegacyPart>,
}

#[derive(Debug, Deserialize)]
pub struct LegacyPart {
    #[serde(default)]
    pub text: Option<String>,
}

impl Default for NewsRequest {
    fn default() -> Self {
        NewsRequest::Direct(DirectNewsRequest::default())
    }
}

impl NewsRequest {
    /// Parses a request body leniently.
    ///
    /// A JSON string holding the JSON body is unwrapped first. Anything that
    /// matches neither shape becomes a request for the generic topic.
    pub fn from_body(body: &[u8]) -> Self {
        let value = match serde_json::from_slice::<Value>(body) {
            Ok(Value::String(inner)) => serde_json::from_str(&inner).unwrap_or(Value::Null),
            Ok(value) => value,
            Err(_) => Value::Null,
        };
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn into_generation_request(self) -> GenerationRequest {
        match self {
            NewsRequest::Direct(direct) => GenerationRequest::new(
                direct.topic.as_deref().unwrap_or_default(),
                direct.source.as_deref(),
            ),
            NewsRequest::Legacy { contents } => {
                let prompt: Vec<String> = contents
                    .into_iter()
                    .flat_map(|c| c.parts)
                    .filter_map(|p| p.text)
                    .collect();
                let topic = match Category::detect(&prompt.join(" ")) {
                    Category::General => "",
                    category => category.label(),
                };
                GenerationRequest::new(topic, None)
            }
        }
    }
}

/// One entry of the `/api/topics` listing.
#[derive(Serialize, Deserialize, Debug)]
pub struct TopicInfo {
    pub id: String,
    pub label: String,
    pub display_source: String,
    pub sources: Vec<String>,
}

impl From<Category> for TopicInfo {
    fn from(category: Category) -> Self {
        Self {
            id: category.id().to_string(),
            label: category.label().to_string(),
            display_source: category.display_source().to_string(),
            sources: category
                .default_sources()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
