use figment::providers::{Format, Serialized, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
///
/// The whole file is optional: with no `config.yaml` present the service
/// listens on 0.0.0.0:3000 with console logging at info, matching the
/// defaults below.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ConfigV1 {
    fn default() -> Self {
        ConfigV1 {
            bind_address: default_bind_address(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

/// Load config from a YAML file named "config.yaml" in the current directory,
/// merged over built-in defaults so the file may be absent or partial.
pub fn load_config() -> ConfigV1 {
    let figment = Figment::from(Serialized::defaults(Config::ConfigV1(ConfigV1::default())))
        .merge(Yaml::file("./config.yaml"));
    let config = match figment.extract::<Config>() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };
    match config {
        Config::ConfigV1(c) => c,
    }

    // handle configuration migration between versions here when necessary
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema).unwrap());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_port_3000() {
        let config = ConfigV1::default();
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "console");
    }

    #[test]
    fn partial_yaml_keeps_default_bind_address() {
        let figment = Figment::from(Serialized::defaults(Config::ConfigV1(ConfigV1::default())))
            .merge(Yaml::string("version: \"1.0.0\"\nlogging:\n  level: debug\n"));
        let config = match figment.extract::<Config>().expect("config should parse") {
            Config::ConfigV1(c) => c,
        };
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.logging.level, "debug");
    }
}
