//! # Core Data Types
//!
//! The values that flow through one run of the pipeline. Each request owns its
//! own chain `GenerationRequest -> PromptSpec -> RawUpstreamResult ->
//! ArticleList`; nothing here is shared between requests.

use crate::{constants::GENERIC_TOPIC, topics::Category};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// One inbound request for headlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: String,
    pub explicit_source: Option<String>,
    pub request_id: Uuid,
}

impl GenerationRequest {
    /// Creates a request with a fresh id. A blank topic becomes the generic
    /// topic and a blank source is dropped.
    pub fn new(topic: &str, explicit_source: Option<&str>) -> Self {
        let topic = match topic.trim() {
            "" => GENERIC_TOPIC.to_string(),
            t => t.to_string(),
        };
        let explicit_source = explicit_source
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
        Self {
            topic,
            explicit_source,
            request_id: Uuid::new_v4(),
        }
    }

    pub fn category(&self) -> Category {
        Category::detect(&self.topic)
    }

    /// The outlet name given to records that arrive without a `source`.
    pub fn default_source(&self) -> &str {
        self.explicit_source
            .as_deref()
            .unwrap_or_else(|| self.category().display_source())
    }
}

/// A hint about the shape the generator should produce.
///
/// Providers that support constrained output translate this into their own
/// schema format; the rest ignore it and rely on the instruction text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralHint {
    /// A flat array of objects with `title`, `source`, and `description`
    /// required and `url`/`image` optional.
    ArticleArray,
}

/// The instruction text and generation parameters for one upstream attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSpec {
    pub instruction_text: String,
    pub max_output_units: u32,
    /// Sampling temperature, always within `[0, 1]`.
    pub randomness: f32,
    pub structural_hint: Option<StructuralHint>,
}

/// Why an upstream call produced no HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout(Duration),
    Connection(String),
}

/// The generator's answer to one attempt, exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUpstreamResult {
    pub http_status: u16,
    pub body_text: String,
    pub succeeded: bool,
    pub transport: Option<TransportFailure>,
}

impl RawUpstreamResult {
    pub fn from_response(http_status: u16, body_text: String) -> Self {
        Self {
            http_status,
            body_text,
            succeeded: (200..300).contains(&http_status),
            transport: None,
        }
    }

    pub fn timed_out(after: Duration) -> Self {
        Self {
            http_status: crate::constants::TIMEOUT_STATUS,
            body_text: format!("upstream call exceeded {}ms", after.as_millis()),
            succeeded: false,
            transport: Some(TransportFailure::Timeout(after)),
        }
    }

    pub fn connection_failed(detail: String) -> Self {
        Self {
            http_status: crate::constants::TRANSPORT_FAILURE_STATUS,
            body_text: detail.clone(),
            succeeded: false,
            transport: Some(TransportFailure::Connection(detail)),
        }
    }
}

/// One news-like record as returned to the client.
///
/// `title`, `source`, and `description` are never empty once a record leaves
/// the validator or the fallback table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub source: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "image", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A non-empty, ordered list of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArticleList(Vec<ArticleRecord>);

impl ArticleList {
    /// Returns `None` for an empty vector.
    pub fn new(records: Vec<ArticleRecord>) -> Option<Self> {
        if records.is_empty() {
            None
        } else {
            Some(Self(records))
        }
    }

    pub fn single(record: ArticleRecord) -> Self {
        Self(vec![record])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed list.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[ArticleRecord] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArticleRecord> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<ArticleRecord> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ArticleList {
    type Item = &'a ArticleRecord;
    type IntoIter = std::slice::Iter<'a, ArticleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_topic_and_source_are_normalized() {
        let request = GenerationRequest::new("   ", Some("  "));
        assert_eq!(request.topic, "News");
        assert_eq!(request.explicit_source, None);
        assert_eq!(request.category(), Category::General);
        assert_eq!(request.default_source(), "News");
    }

    #[test]
    fn explicit_source_wins_over_category_default() {
        let request = GenerationRequest::new("finance", Some("Mint"));
        assert_eq!(request.default_source(), "Mint");
        let request = GenerationRequest::new("finance", None);
        assert_eq!(request.default_source(), "The Economic Times");
    }

    #[test]
    fn status_decides_success() {
        assert!(RawUpstreamResult::from_response(200, String::new()).succeeded);
        assert!(!RawUpstreamResult::from_response(429, String::new()).succeeded);
        let timed_out = RawUpstreamResult::timed_out(Duration::from_millis(9000));
        assert!(!timed_out.succeeded);
        assert_eq!(timed_out.http_status, 504);
    }

    #[test]
    fn empty_list_cannot_be_built() {
        assert!(ArticleList::new(Vec::new()).is_none());
    }

    #[test]
    fn record_serializes_image_key() {
        let record = ArticleRecord {
            title: "t".into(),
            source: "s".into(),
            description: "d".into(),
            url: None,
            image_url: Some("https://img.example/a.png".into()),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["image"], "https://img.example/a.png");
        assert!(value.get("url").is_none());
    }
}
