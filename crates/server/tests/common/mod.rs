//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the `newsrelay-server`
//! integration tests.
//!
//! - `TestApp`: spawns a real server on a random port, configured to call a
//!   `wiremock::MockServer` in place of the Gemini API.
//! - Helpers for building Gemini response envelopes.

// Not every helper is used by every test file that includes this module.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use newsrelay_server::{
    config, router,
    state::{build_app_state, AppState},
};
use reqwest::Client;
use serde_json::{json, Value};
use std::{fs::File, io::Write, net::SocketAddr};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};
use wiremock::MockServer;

/// The path the mock Gemini endpoint is mounted on.
pub const GEMINI_PATH: &str = "/v1beta/models/test-model:generateContent";

/// The credential the test server is configured with.
pub const TEST_API_KEY: &str = "test-key";

// --- Full Application Test Harness ---

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_extra_config("").await
    }

    /// Like `spawn`, with extra YAML appended to the generated config file.
    pub async fn spawn_with_extra_config(extra: &str) -> Result<Self> {
        Self::spawn_with_api_url(None, extra).await
    }

    /// Like `spawn_with_extra_config`, calling `api_url` instead of the mock
    /// server's Gemini endpoint.
    pub async fn spawn_with_api_url(api_url: Option<&str>, extra: &str) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start().await;

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let api_url = api_url
            .map(String::from)
            .unwrap_or_else(|| format!("{}{}", mock_server.uri(), GEMINI_PATH));
        // Debug output is on for tests unless the caller configures it.
        let debug_line = if extra.contains("debug_responses") {
            ""
        } else {
            "debug_responses: true"
        };
        let config_content = format!(
            r#"
port: 0
ai_provider: "gemini"
ai_api_url: "{api_url}"
ai_api_key: "{TEST_API_KEY}"
model_name: "test-model"
upstream_timeout_ms: 500
max_records: 5
{debug_line}
{extra}
"#
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(Some(config_path.to_str().unwrap()))?;
        let app_state = build_app_state(config).await?;
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state: app_state_for_harness,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// A Gemini success envelope whose generated text is `text`.
pub fn gemini_envelope(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP"
        }]
    })
}

/// Generated text holding `count` complete records.
pub fn headlines_text(count: usize) -> String {
    let records: Vec<Value> = (1..=count)
        .map(|i| {
            json!({
                "title": format!("Live headline {i}"),
                "source": "Wire",
                "description": format!("Live story {i}."),
                "url": format!("https://news.example/{i}")
            })
        })
        .collect();
    Value::Array(records).to_string()
}
