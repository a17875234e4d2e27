//! Metrics collection and exposition for Prometheus.
//!
//! This module provides centralized metrics recording

mod process;
mod recorder;

pub use process::ProcessMetrics;
pub use recorder::{Metrics, MetricsRecorder, COLLECTION_INTERVAL};
