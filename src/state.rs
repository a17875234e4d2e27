//! Shared application state.
//!
//! Contains the state that is shared across all request handlers:
//! configuration and the metrics registry.

use crate::config::ConfigV1;
use crate::metrics::Metrics;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request handler. The metrics registry is explicitly
/// constructed at startup and handed in here rather than living in a
/// global, which keeps initialization and test isolation explicit.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Metrics registry: request counter plus default process metrics.
    pub metrics: Metrics,
}
