//! # News Route Handlers
//!
//! Both news routes answer `200` with a non-empty list of headlines, whatever
//! the upstream generator does. Failures only show up in the logs and, with
//! `?debug=true` on a server that allows it, in the `debug` section of the
//! response.

use super::{debug_requested, wrap_response, AppState, DebugParams};
use crate::types::{NewsRequest, TopicInfo};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    response::Response,
    Json,
};
use newsrelay::Category;
use serde_json::json;
use tracing::info;

/// The handler for `POST /api/news` and the legacy `POST /api/gemini`.
///
/// The body is parsed leniently (see [`NewsRequest::from_body`]), so a
/// malformed request still gets headlines for the generic topic.
pub async fn news_handler(
    State(app_state): State<AppState>,
    debug_query: Result<Query<DebugParams>, QueryRejection>,
    body: Bytes,
) -> Response {
    let debug = debug_requested(&app_state, debug_query);
    let request = NewsRequest::from_body(&body).into_generation_request();
    info!(
        request_id = %request.request_id,
        topic = %request.topic,
        source = ?request.explicit_source,
        "Received news request"
    );

    let outcome = app_state.pipeline.run(&request).await;

    wrap_response(&outcome.articles, debug, || {
        json!({
            "request_id": request.request_id,
            "topic": request.topic,
            "category": request.category().label(),
            "origin": outcome.origin,
            "upstream_calls": outcome.upstream_calls,
            "failures": outcome.failures,
        })
    })
}

/// The handler for `GET /api/topics`.
pub async fn topics_handler() -> Json<Vec<TopicInfo>> {
    Json(Category::ALL.into_iter().map(TopicInfo::from).collect())
}
