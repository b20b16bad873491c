//! # Prompt Construction
//!
//! Turns a [`GenerationRequest`] into the [`PromptSpec`] for an upstream
//! attempt. Both builders are pure: the date is passed in so callers decide
//! what "today" means.

pub mod core;

use self::core::*;
use crate::types::{GenerationRequest, PromptSpec, StructuralHint};
use chrono::NaiveDate;

/// Builds the prompt for the first attempt.
pub fn build_prompt(request: &GenerationRequest, today: NaiveDate, count: usize) -> PromptSpec {
    PromptSpec {
        instruction_text: render(HEADLINES_PROMPT, request, today, count),
        max_output_units: FULL_MAX_OUTPUT_UNITS,
        randomness: FULL_RANDOMNESS,
        structural_hint: Some(StructuralHint::ArticleArray),
    }
}

/// Builds the shorter, cooler prompt used for the single retry.
pub fn build_simplified_prompt(
    request: &GenerationRequest,
    today: NaiveDate,
    count: usize,
) -> PromptSpec {
    PromptSpec {
        instruction_text: render(SIMPLIFIED_HEADLINES_PROMPT, request, today, count),
        max_output_units: SIMPLIFIED_MAX_OUTPUT_UNITS,
        randomness: SIMPLIFIED_RANDOMNESS,
        structural_hint: None,
    }
}

/// Names the outlets the generator should draw from: the explicit source if
/// the caller gave one, otherwise the category's usual outlets.
fn source_clause(request: &GenerationRequest) -> String {
    if let Some(source) = &request.explicit_source {
        return format!(" from {source}");
    }
    let sources = request.category().default_sources();
    if sources.is_empty() {
        String::new()
    } else {
        format!(" from {}", sources.join(", "))
    }
}

fn render(template: &str, request: &GenerationRequest, today: NaiveDate, count: usize) -> String {
    template
        .replace("{topic}", &request.topic)
        .replace("{source_clause}", &source_clause(request))
        .replace("{date}", &today.format("%A, %B %-d, %Y").to_string())
        .replace("{count}", &count.to_string())
}
