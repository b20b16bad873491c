//! # Relay Pipeline
//!
//! `NewsPipeline` ties the stages together and owns the retry policy:
//!
//! - **Initial**: call the generator with the full prompt. A response that
//!   extracts and validates ends the run.
//! - **Retrying**: any failure in the first attempt (transport, status,
//!   extraction, validation) triggers exactly one more call with the
//!   simplified prompt.
//! - **Done**: the validated list, or the fallback list for the request's
//!   category if the retry failed too.
//!
//! A run makes at most two upstream calls, one after the other, and always
//! ends with a non-empty list. Both calls share one request budget: the retry
//! only gets what the first attempt left, and is skipped if nothing is left.

use crate::{
    constants::{DEFAULT_MAX_RECORDS, DEFAULT_REQUEST_BUDGET, MAX_RECORDS_LIMIT},
    errors::RelayError,
    extract::extract_structural_payload,
    fallback::FallbackTable,
    prompts::{build_prompt, build_simplified_prompt},
    providers::ai::AiProvider,
    types::{ArticleList, GenerationRequest, PromptSpec, RawUpstreamResult},
    validate::validate_records,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// The longest slice of an error body kept in a failure description.
const ERROR_BODY_PREVIEW: usize = 200;

/// Where the articles of a finished run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// The first attempt succeeded.
    Live,
    /// The first attempt failed and the simplified retry succeeded.
    Retried,
    /// Both attempts failed; the articles are from the fallback table.
    Fallback,
}

/// The result of one run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub articles: ArticleList,
    pub origin: Origin,
    pub upstream_calls: u8,
    /// One line per failed attempt, oldest first.
    pub failures: Vec<String>,
}

enum RetryState {
    Initial,
    Retrying { first_failure: RelayError },
    Done(PipelineOutcome),
}

/// The normalization-and-fallback pipeline.
#[derive(Debug, Clone)]
pub struct NewsPipeline {
    pub(crate) ai_provider: Box<dyn AiProvider>,
    pub(crate) fallback: Arc<FallbackTable>,
    pub(crate) max_records: usize,
    pub(crate) request_budget: Duration,
}

impl NewsPipeline {
    /// Produces the article list for `request`, dated today in local time.
    pub async fn run(&self, request: &GenerationRequest) -> PipelineOutcome {
        self.run_on(request, chrono::Local::now().date_naive()).await
    }

    /// Produces the article list for `request` with prompts dated `today`.
    #[instrument(skip_all, fields(request_id = %request.request_id, topic = %request.topic))]
    pub async fn run_on(&self, request: &GenerationRequest, today: NaiveDate) -> PipelineOutcome {
        let deadline = Instant::now() + self.request_budget;
        let mut upstream_calls = 0;
        let mut state = RetryState::Initial;
        loop {
            state = match state {
                RetryState::Initial => {
                    let prompt = build_prompt(request, today, self.max_records);
                    match self
                        .attempt(request, &prompt, deadline, &mut upstream_calls)
                        .await
                    {
                        Ok(articles) => RetryState::Done(PipelineOutcome {
                            articles,
                            origin: Origin::Live,
                            upstream_calls,
                            failures: Vec::new(),
                        }),
                        Err(e) => {
                            warn!(error = %e, "First attempt failed, retrying with simplified prompt");
                            RetryState::Retrying { first_failure: e }
                        }
                    }
                }
                RetryState::Retrying { first_failure } => {
                    let mut failures = vec![first_failure.to_string()];
                    let prompt = build_simplified_prompt(request, today, self.max_records);
                    match self
                        .attempt(request, &prompt, deadline, &mut upstream_calls)
                        .await
                    {
                        Ok(articles) => RetryState::Done(PipelineOutcome {
                            articles,
                            origin: Origin::Retried,
                            upstream_calls,
                            failures,
                        }),
                        Err(e) => {
                            warn!(error = %e, "Retry failed, serving fallback headlines");
                            failures.push(e.to_string());
                            RetryState::Done(PipelineOutcome {
                                articles: self.fallback.lookup(request.category()),
                                origin: Origin::Fallback,
                                upstream_calls,
                                failures,
                            })
                        }
                    }
                }
                RetryState::Done(outcome) => {
                    info!(
                        origin = ?outcome.origin,
                        upstream_calls = outcome.upstream_calls,
                        articles = outcome.articles.len(),
                        "Pipeline finished"
                    );
                    return outcome;
                }
            };
        }
    }

    /// One upstream call, bounded by what is left of the request budget,
    /// followed by extraction and validation.
    async fn attempt(
        &self,
        request: &GenerationRequest,
        prompt: &PromptSpec,
        deadline: Instant,
        upstream_calls: &mut u8,
    ) -> Result<ArticleList, RelayError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(RelayError::BudgetExhausted(self.request_budget));
        }

        *upstream_calls += 1;
        let raw = match tokio::time::timeout(remaining, self.ai_provider.invoke(prompt)).await {
            Ok(raw) => raw,
            Err(_) => {
                warn!(
                    provider = self.ai_provider.name(),
                    remaining_ms = remaining.as_millis() as u64,
                    "Upstream call cut off by the request budget"
                );
                RawUpstreamResult::timed_out(remaining)
            }
        };

        if !raw.succeeded {
            return Err(match raw.transport {
                Some(_) => RelayError::UpstreamTransport(raw.body_text),
                None => RelayError::UpstreamStatus {
                    status: raw.http_status,
                    body: raw.body_text.chars().take(ERROR_BODY_PREVIEW).collect(),
                },
            });
        }

        let payload = extract_structural_payload(self.ai_provider.as_ref(), &raw)?;
        debug!(payload_len = payload.len(), "Extracted structural payload");

        Ok(validate_records(
            &payload,
            request.default_source(),
            self.max_records,
        )?)
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }

    pub fn fallback_table(&self) -> &FallbackTable {
        &self.fallback
    }

    pub fn request_budget(&self) -> Duration {
        self.request_budget
    }
}

/// A builder for creating `NewsPipeline` instances.
#[derive(Default)]
pub struct NewsPipelineBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    fallback: Option<Arc<FallbackTable>>,
    max_records: Option<usize>,
    request_budget: Option<Duration>,
}

impl NewsPipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the generator the pipeline calls.
    pub fn ai_provider(mut self, ai_provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(ai_provider);
        self
    }

    /// Sets the fallback table. Defaults to [`FallbackTable::builtin`].
    pub fn fallback_table(mut self, fallback: Arc<FallbackTable>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Sets how many records are requested and returned.
    pub fn max_records(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        self
    }

    /// Sets the bound on all upstream calls for one request. Defaults to
    /// [`DEFAULT_REQUEST_BUDGET`].
    pub fn request_budget(mut self, request_budget: Duration) -> Self {
        self.request_budget = Some(request_budget);
        self
    }

    /// Builds the `NewsPipeline`.
    ///
    /// Fails if no provider was set, the record cap is outside
    /// `1..=MAX_RECORDS_LIMIT`, or the request budget is zero.
    pub fn build(self) -> Result<NewsPipeline, RelayError> {
        let ai_provider = self.ai_provider.ok_or(RelayError::MissingAiProvider)?;
        let max_records = self.max_records.unwrap_or(DEFAULT_MAX_RECORDS);
        if !(1..=MAX_RECORDS_LIMIT).contains(&max_records) {
            return Err(RelayError::InvalidRecordCap(max_records));
        }
        let request_budget = self.request_budget.unwrap_or(DEFAULT_REQUEST_BUDGET);
        if request_budget.is_zero() {
            return Err(RelayError::InvalidRequestBudget);
        }
        Ok(NewsPipeline {
            ai_provider,
            fallback: self
                .fallback
                .unwrap_or_else(|| Arc::new(FallbackTable::builtin())),
            max_records,
            request_budget,
        })
    }
}
