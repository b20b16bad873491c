//! # newsrelay
//!
//! This crate turns a news topic into a list of article records by asking a
//! text-generation provider for headlines and normalizing whatever comes back.
//!
//! The generator is treated as unreliable. Every response goes through the
//! same pipeline:
//!
//! 1. [`prompts`] builds the instruction and generation parameters.
//! 2. A [`providers::ai::AiProvider`] performs one bounded HTTP call.
//! 3. [`extract`] isolates the JSON array from the generated text.
//! 4. [`validate`] coerces each element into an [`ArticleRecord`].
//! 5. [`pipeline`] retries once with a simplified prompt and finally falls
//!    back to the static [`fallback::FallbackTable`].
//!
//! The result of [`NewsPipeline::run`] is never empty and never an error.

pub mod constants;
pub mod errors;
pub mod extract;
pub mod fallback;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod topics;
pub mod types;
pub mod validate;

pub use errors::{ExtractionError, FallbackError, RelayError, ValidationError};
pub use fallback::FallbackTable;
pub use pipeline::{NewsPipeline, NewsPipelineBuilder, Origin, PipelineOutcome};
pub use topics::Category;
pub use types::{
    ArticleList, ArticleRecord, GenerationRequest, PromptSpec, RawUpstreamResult, StructuralHint,
    TransportFailure,
};
