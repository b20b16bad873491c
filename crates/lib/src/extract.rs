//! # Response Extraction
//!
//! Generators reliably emit valid array syntax but unreliably keep it clean:
//! the array arrives inside code fences, after a chatty preamble, or followed
//! by a sign-off. This module strips that wrapping and isolates the array.

use crate::{errors::ExtractionError, providers::ai::AiProvider, types::RawUpstreamResult};
use regex::Regex;
use std::sync::LazyLock;

/// Matches a Markdown fence marker with an optional language tag (```` ``` ````, ```` ```json ````).
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_-]*").expect("code fence pattern is valid"));

/// Removes every code-fence marker, wherever it appears in the text.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").into_owned()
}

/// Returns the slice from the first `[` to the last `]`, inclusive.
pub fn slice_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// Isolates the JSON array inside generated text.
///
/// Fences are stripped first, then surrounding whitespace, then everything
/// outside the outermost brackets.
pub fn extract_payload(generated: &str) -> Result<String, ExtractionError> {
    let unfenced = strip_code_fences(generated);
    slice_array(unfenced.trim())
        .map(String::from)
        .ok_or(ExtractionError::NoArray)
}

/// Decodes the provider envelope of a successful result and extracts the array.
pub fn extract_structural_payload(
    provider: &dyn AiProvider,
    raw: &RawUpstreamResult,
) -> Result<String, ExtractionError> {
    let generated = provider.decode_envelope(&raw.body_text)?;
    extract_payload(&generated)
}
