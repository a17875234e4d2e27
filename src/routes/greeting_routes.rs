//! Greeting endpoint.

use crate::metrics::MetricsRecorder;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, routing::get, Router};

/// Registers the greeting route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(greeting_handler).fallback(super::not_found))
}

/// Handler for the root endpoint.
///
/// Counts the request and returns a fixed plaintext greeting.
async fn greeting_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.record_request();
    "Hello World!"
}
