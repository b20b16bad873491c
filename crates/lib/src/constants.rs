//! # Shared Constants
//!
//! Defaults and fixed values shared by the `newsrelay` crates. Keeping them in
//! one place avoids "magic strings" drifting apart between the library and the
//! server configuration.

use std::time::Duration;

/// The Gemini model used when the configuration does not name one.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";

/// The base URL for Gemini `generateContent` calls. `{model}` is replaced with the model name.
pub const GEMINI_GENERATE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent";

/// The bound on a single upstream call.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(9);

/// The bound on every upstream call made for one request, retry included.
/// Kept under the 10 second deadline of the hosting platforms the relay is
/// deployed on.
pub const DEFAULT_REQUEST_BUDGET: Duration = Duration::from_millis(9500);

/// The number of records requested and returned when not configured.
pub const DEFAULT_MAX_RECORDS: usize = 5;

/// The largest record cap the pipeline accepts.
pub const MAX_RECORDS_LIMIT: usize = 8;

/// The topic used when a request arrives without one.
pub const GENERIC_TOPIC: &str = "News";

/// The description given to records that arrive without one.
pub const PLACEHOLDER_DESCRIPTION: &str =
    "Details are loading. Check back shortly for the full story.";

/// The synthetic status reported when an upstream call exceeds its timeout.
pub const TIMEOUT_STATUS: u16 = 504;

/// The synthetic status reported when an upstream call fails below HTTP.
pub const TRANSPORT_FAILURE_STATUS: u16 = 502;
