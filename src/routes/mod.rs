//! HTTP route definitions and handlers.
//!
//! Two endpoints exist: the greeting root and the Prometheus scrape
//! endpoint. Everything else falls through to axum's default 404.

mod greeting_routes;
mod metrics_routes;

use crate::state::AppState;
use axum::http::StatusCode;
use axum::Router;

/// Fallback for unmatched methods on registered paths.
///
/// Both endpoints are GET-only; anything else behaves like an unknown
/// path and gets a plain 404 instead of axum's default 405.
pub(crate) async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router and attaches
/// the application state for access in handlers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(greeting_routes::routes())
        .merge(metrics_routes::routes())
        .with_state(state)
}
