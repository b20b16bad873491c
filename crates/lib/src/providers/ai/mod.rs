pub mod gemini;
pub mod local;

use crate::{
    errors::ExtractionError,
    types::{PromptSpec, RawUpstreamResult},
};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// A trait for interacting with a text-generation provider.
///
/// Implementations are the boundary between the relay and an unreliable
/// external service: `invoke` performs exactly one bounded HTTP call and turns
/// every outcome (success, error status, timeout, connection failure) into a
/// [`RawUpstreamResult`]. It never returns an error and never panics on I/O.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// A short name for logs, e.g. `"gemini"`.
    fn name(&self) -> &str;

    /// Sends one generation request for `prompt`.
    async fn invoke(&self, prompt: &PromptSpec) -> RawUpstreamResult;

    /// Pulls the generated text out of this provider's success envelope.
    fn decode_envelope(&self, body: &str) -> Result<String, ExtractionError>;
}

dyn_clone::clone_trait_object!(AiProvider);

/// Runs an HTTP exchange under a hard timeout and folds the outcome into a
/// [`RawUpstreamResult`].
///
/// On timeout the exchange future is dropped, which aborts the in-flight
/// reqwest request and releases its connection.
pub(crate) async fn bounded_call<F>(provider: &str, timeout: Duration, exchange: F) -> RawUpstreamResult
where
    F: Future<Output = Result<(u16, String), reqwest::Error>>,
{
    match tokio::time::timeout(timeout, exchange).await {
        Ok(Ok((status, body))) => RawUpstreamResult::from_response(status, body),
        Ok(Err(e)) => {
            // The URL may carry a credential.
            let e = e.without_url();
            warn!(provider, error = %e, "Upstream call failed before a response was read");
            RawUpstreamResult::connection_failed(e.to_string())
        }
        Err(_) => {
            warn!(provider, timeout_ms = timeout.as_millis() as u64, "Upstream call timed out");
            RawUpstreamResult::timed_out(timeout)
        }
    }
}
