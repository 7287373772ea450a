//! TOML configuration file.
//!
//! ```toml
//! [connection]
//! brokers = ["kafka:29092"]
//! group_id = "orders-reader"
//! max_poll_interval_ms = 30000
//!
//! [options]
//! include_key = false
//! log_path = "/var/log/kafka-connector"
//! ```
//!
//! Every field is optional and falls back to its default.

use anyhow::Context;
use kafka_types::{ConnectionParameters, ConnectorOptions};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectorConfig {
    pub connection: ConnectionParameters,
    pub options: ConnectorOptions,
}

impl ConnectorConfig {
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse connector config")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config = ConnectorConfig::from_toml_str("").unwrap();
        assert_eq!(config, ConnectorConfig::default());
        assert!(config.options.include_key);
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[connection]
brokers = ["kafka-1:9092", "kafka-2:9092"]
group_id = "orders-reader"

[options]
include_key = false
wrap_in_envelope = true
"#
        )
        .unwrap();

        let config = ConnectorConfig::from_file(file.path()).unwrap();

        assert_eq!(
            config.connection.bootstrap_servers(),
            "kafka-1:9092,kafka-2:9092"
        );
        assert_eq!(config.connection.group_id, "orders-reader");
        assert_eq!(config.connection.max_poll_interval_ms, 10_000);
        assert!(!config.options.include_key);
        assert!(config.options.wrap_in_envelope);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = ConnectorConfig::from_file(Path::new("/nonexistent/kafka.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/kafka.toml"));
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        assert!(ConnectorConfig::from_toml_str("[producer]\nacks = 1\n").is_err());
    }
}
