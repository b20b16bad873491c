use super::{handlers, state::AppState};
use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

/// Headlines go stale quickly; no response may be cached anywhere.
const NO_CACHE: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/api/news", post(handlers::news_handler))
        .route("/api/gemini", post(handlers::news_handler))
        .route("/api/topics", get(handlers::topics_handler))
        .with_state(app_state)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(NO_CACHE),
        ))
        .layer(TraceLayer::new_for_http())
}
