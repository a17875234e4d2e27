use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use greetotron::config::{Config, ConfigV1};
use greetotron::metrics::Metrics;
use greetotron::routes::create_router;
use greetotron::state::AppState;

pub const TEST_CONFIG: &str = r#"
version: "1.0.0"
logging:
  level: "debug"
  format: "json"
bind_address: 127.0.0.1:8081
"#;

pub fn load_test_config() -> ConfigV1 {
    let config: Config = Figment::new()
        .merge(Yaml::string(TEST_CONFIG))
        .extract()
        .expect("Failed to parse test config YAML");

    match config {
        Config::ConfigV1(cfg) => cfg,
    }
}

pub fn build_app(config: ConfigV1) -> (Router, Metrics) {
    let config = Arc::new(config);
    let metrics = Metrics::new();

    let state = AppState {
        config,
        metrics: metrics.clone(),
    };

    (create_router(state), metrics)
}

pub fn build_request(path: &str, method: Method) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}
