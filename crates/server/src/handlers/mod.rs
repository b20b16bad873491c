//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the `newsrelay-server`.

pub mod general;
pub mod news;

pub use general::*;
pub use news::*;

use super::{
    state::AppState,
    types::{ApiResponse, DebugParams},
};
use axum::{
    extract::{rejection::QueryRejection, Query},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

/// Whether a request gets debug output: the operator must allow it and the
/// caller must ask for it. A query string that does not parse asks for nothing.
pub(crate) fn debug_requested(
    app_state: &AppState,
    query: Result<Query<DebugParams>, QueryRejection>,
) -> bool {
    let params = query.map(|Query(params)| params).unwrap_or_default();
    app_state.config.debug_responses && params.enabled()
}

/// A shared helper to render a result, wrapped in the `ApiResponse` envelope
/// with debug information when `debug` is set, bare otherwise.
pub(crate) fn wrap_response<T: Serialize>(
    result: T,
    debug: bool,
    debug_info: impl FnOnce() -> Value,
) -> Response {
    if debug {
        Json(ApiResponse {
            debug: Some(debug_info()),
            result,
        })
        .into_response()
    } else {
        Json(result).into_response()
    }
}
