#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared helpers for the `newsrelay` integration tests: a scripted provider
//! that records every prompt it receives, and one-time tracing setup.

use async_trait::async_trait;
use newsrelay::{
    errors::ExtractionError,
    providers::ai::AiProvider,
    types::{PromptSpec, RawUpstreamResult},
};
use std::sync::{Arc, Once, RwLock};
use std::time::Duration;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber once per test binary.
pub fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// --- Mock AI Provider for Pipeline Testing ---

/// Answers each `invoke` with the next scripted result, in order.
///
/// The mock has no envelope: `decode_envelope` treats the whole body as the
/// generated text.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    pub call_history: Arc<RwLock<Vec<PromptSpec>>>,
    pub responses: Arc<RwLock<Vec<RawUpstreamResult>>>,
    /// How long each call takes, in call order. Calls past the end are instant.
    pub delays: Arc<RwLock<Vec<Duration>>>,
}

impl MockAiProvider {
    pub fn new(responses: Vec<RawUpstreamResult>) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            responses: Arc::new(RwLock::new(responses.into_iter().rev().collect())),
            delays: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Makes the calls take `delays`, in order, before answering.
    pub fn with_delays(self, delays: &[Duration]) -> Self {
        *self.delays.write().unwrap() = delays.iter().rev().copied().collect();
        self
    }

    /// A mock that answers every call with `200` and `body`.
    pub fn ok(bodies: &[&str]) -> Self {
        Self::new(
            bodies
                .iter()
                .map(|b| RawUpstreamResult::from_response(200, b.to_string()))
                .collect(),
        )
    }

    pub fn calls(&self) -> Vec<PromptSpec> {
        self.call_history.read().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn invoke(&self, prompt: &PromptSpec) -> RawUpstreamResult {
        self.call_history.write().unwrap().push(prompt.clone());
        let delay = self.delays.write().unwrap().pop();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .write()
            .unwrap()
            .pop()
            .unwrap_or_else(|| RawUpstreamResult::from_response(500, "no scripted response".into()))
    }

    fn decode_envelope(&self, body: &str) -> Result<String, ExtractionError> {
        Ok(body.to_string())
    }
}

/// A generated payload with `count` well-formed records.
pub fn article_payload(count: usize) -> String {
    let records: Vec<String> = (1..=count)
        .map(|i| {
            format!(
                r#"{{"title":"Headline {i}","source":"Wire","description":"Story {i}.","url":"https://news.example/{i}"}}"#
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}
