//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. Everything in it is read-only after startup, so
//! handlers share it through `Arc`s without locking.

use crate::config::AppConfig;
use anyhow::Context;
use newsrelay::{providers::factory::create_provider, FallbackTable, NewsPipeline, NewsPipelineBuilder};
use std::{fs, sync::Arc, time::Duration};
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<AppConfig>,
    /// The pipeline every news request runs through.
    pub pipeline: Arc<NewsPipeline>,
}

/// Builds the shared application state from the configuration.
///
/// This instantiates the configured AI provider, loads the fallback table
/// (the built-in one unless `fallback_path` names a YAML file), and assembles
/// the pipeline.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let ai_provider = create_provider(&config.provider_settings())?;

    let fallback = match &config.fallback_path {
        Some(path) => {
            let yaml = fs::read_to_string(path)
                .with_context(|| format!("Failed to read fallback table '{path}'"))?;
            let table = FallbackTable::from_yaml_str(&yaml)
                .with_context(|| format!("Invalid fallback table '{path}'"))?;
            info!("Loaded fallback headlines from '{path}'.");
            table
        }
        None => FallbackTable::builtin(),
    };

    let pipeline = NewsPipelineBuilder::new()
        .ai_provider(ai_provider)
        .fallback_table(Arc::new(fallback))
        .max_records(config.max_records)
        .request_budget(Duration::from_millis(config.request_budget_ms))
        .build()?;

    info!(
        provider = %config.ai_provider,
        model = %config.model_name,
        max_records = config.max_records,
        request_budget_ms = config.request_budget_ms,
        "Pipeline ready"
    );

    Ok(AppState {
        config: Arc::new(config),
        pipeline: Arc::new(pipeline),
    })
}
