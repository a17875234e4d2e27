use std::sync::Arc;

use greetotron::config::{load_config, print_schema};
use greetotron::startup;
use greetotron::utils::logger::init_logging;

#[tokio::main]
async fn main() {
    // `greetotron --schema` prints the config JSON schema and exits.
    if std::env::args().any(|arg| arg == "--schema") {
        print_schema();
        return;
    }

    let config = load_config();
    init_logging(&config.logging);

    if let Err(e) = startup::run(Arc::new(config)).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
