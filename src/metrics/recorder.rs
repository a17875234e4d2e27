//! Metrics recording implementation using Prometheus.

use prometheus::{
    register_int_counter_with_registry, Encoder, IntCounter, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::process::ProcessMetrics;

/// How often the default process metrics are refreshed.
pub const COLLECTION_INTERVAL: Duration = Duration::from_millis(5000);

/// Trait for recording application metrics.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Records one handled greeting request.
    fn record_request(&self);
}

/// Prometheus metrics collector.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,

    // Request metrics
    http_requests_total: IntCounter,

    // Default process-level metrics, refreshed by the collector task
    process: ProcessMetrics,
}

impl Metrics {
    /// Creates a new metrics instance with a Prometheus registry.
    pub fn new() -> Self {
        let registry = Arc::new(Registry::new());

        let http_requests_total = register_int_counter_with_registry!(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            registry.clone()
        )
        .expect("Failed to register http_requests_total");

        let process = ProcessMetrics::new(&registry);

        Metrics {
            registry,
            http_requests_total,
            process,
        }
    }

    /// Refreshes the default process metrics once.
    pub fn collect_process_metrics(&self) {
        self.process.collect();
    }

    /// Spawns the background task refreshing process metrics on a fixed
    /// interval, independent of request traffic. Runs until process exit.
    pub fn spawn_collector(&self) -> tokio::task::JoinHandle<()> {
        let metrics = self.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(COLLECTION_INTERVAL);
            loop {
                tick.tick().await;
                metrics.collect_process_metrics();
                debug!("Refreshed default process metrics");
            }
        })
    }

    /// Renders all metrics in Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Metrics::new()
    }
}

impl MetricsRecorder for Metrics {
    fn record_request(&self) {
        self.http_requests_total.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_counter_starts_at_zero() {
        let metrics = Metrics::new();
        let body = metrics.render().expect("render should succeed");
        assert!(body.contains("http_requests_total 0"));
    }

    #[test]
    fn request_counter_is_exact_and_monotone() {
        let metrics = Metrics::new();
        for _ in 0..3 {
            metrics.record_request();
        }
        let body = metrics.render().expect("render should succeed");
        assert!(body.contains("http_requests_total 3"));
    }

    #[test]
    fn render_includes_type_and_help_metadata() {
        let metrics = Metrics::new();
        let body = metrics.render().expect("render should succeed");
        assert!(body.contains("# HELP http_requests_total Total number of HTTP requests"));
        assert!(body.contains("# TYPE http_requests_total counter"));
    }

    #[test]
    fn render_includes_default_process_metrics() {
        let metrics = Metrics::new();
        metrics.collect_process_metrics();
        let body = metrics.render().expect("render should succeed");
        assert!(body.contains("process_start_time_seconds"));
        assert!(body.contains("process_uptime_seconds"));
        assert!(body.contains("process_resident_memory_bytes"));
    }
}
