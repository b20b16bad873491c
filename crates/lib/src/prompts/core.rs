//! # Default Prompt Templates
//!
//! The instruction templates sent to the generator. The full template is used
//! on the first attempt; the simplified one on the single retry.
//!
//! Placeholders: `{topic}`, `{source_clause}`, `{date}`, `{count}`

/// The instruction for the first attempt.
pub const HEADLINES_PROMPT: &str = r#"You are a news wire service. Today is {date}.
List {count} distinct, recent news headlines about {topic}{source_clause}.

# Output Contract
Return ONLY a raw JSON array of exactly {count} objects. Each object MUST have exactly these keys:
- "title": the headline, as a plain string
- "source": the name of the publication
- "description": one or two sentences summarising the story
Each object MAY also have:
- "url": an absolute link to the article
- "image": an absolute link to a representative image

# Rules
1. Do NOT use Markdown. Do NOT wrap the array in code fences.
2. Do NOT write any text before or after the array.
3. Every object MUST have a non-empty "title"."#;

/// The shorter instruction for the retry after a failed first attempt.
pub const SIMPLIFIED_HEADLINES_PROMPT: &str = "Topic: {topic}{source_clause}. Date: {date}. Task: List {count} distinct news headlines. Format: a raw JSON array only, no Markdown. Keys: title, source, description.";

/// Output length cap for the first attempt.
pub const FULL_MAX_OUTPUT_UNITS: u32 = 1024;

/// Output length cap for the retry.
pub const SIMPLIFIED_MAX_OUTPUT_UNITS: u32 = 600;

/// Sampling temperature for the first attempt.
pub const FULL_RANDOMNESS: f32 = 0.7;

/// Sampling temperature for the retry.
pub const SIMPLIFIED_RANDOMNESS: f32 = 0.2;
