use thiserror::Error;

/// Custom error types for the relay.
///
/// Only the construction-time variants (`ReqwestClientBuild`, `MissingApiKey`,
/// `MissingApiUrl`, `MissingAiProvider`, `InvalidRecordCap`,
/// `InvalidRequestBudget`, `UnsupportedProvider`) ever leave the crate as
/// errors. The upstream variants describe a failed attempt and are consumed by
/// the retry policy in [`crate::pipeline`].
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("API key is missing")]
    MissingApiKey,
    #[error("API URL is missing for the {0} provider")]
    MissingApiUrl(String),
    #[error("AI provider is missing")]
    MissingAiProvider,
    #[error("Record cap must be between 1 and {max}, got {0}", max = crate::constants::MAX_RECORDS_LIMIT)]
    InvalidRecordCap(usize),
    #[error("Request budget must be greater than zero")]
    InvalidRequestBudget,
    #[error("Request budget of {0:?} exhausted before the next attempt")]
    BudgetExhausted(std::time::Duration),
    #[error("Unsupported AI provider: {0}")]
    UnsupportedProvider(String),
    #[error("Request to upstream generator failed: {0}")]
    UpstreamTransport(String),
    #[error("Upstream generator returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Failures while pulling the structural payload out of a provider response.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("response envelope is not valid JSON: {0}")]
    MalformedEnvelope(String),
    #[error("response envelope has no `{0}`")]
    MissingField(&'static str),
    #[error("generated text contains no JSON array")]
    NoArray,
}

/// Failures while coercing the payload into article records.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("payload is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("payload is not an array")]
    NotAnArray,
    #[error("payload is an empty array")]
    EmptyArray,
    #[error("no element of the payload has a usable title")]
    NoUsableRecords,
}

/// Failures while loading an operator-provided fallback table.
#[derive(Error, Debug)]
pub enum FallbackError {
    #[error("fallback table is not valid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("fallback table has no `General` set")]
    MissingGeneral,
    #[error("fallback table names an unknown category: {0}")]
    UnknownCategory(String),
    #[error("fallback set for {0} is empty")]
    EmptySet(String),
    #[error("fallback record in {category} has a blank `{field}`")]
    BlankField {
        category: String,
        field: &'static str,
    },
}
