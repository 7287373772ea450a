//! Command-line connection options.

use clap::Args;
use kafka_types::{ConnectionParameters, ConnectorOptions};
use std::path::PathBuf;

use super::duration::duration_millis_arg;
use super::file::ConnectorConfig;

/// Broker connection options shared by every subcommand.
#[derive(Args, Clone, Debug)]
pub struct ConnectionOpts {
    /// Kafka brokers (comma-separated, e.g., "localhost:9092")
    #[arg(
        long,
        env = "KAFKA_BROKERS",
        default_value = "localhost:9092",
        value_delimiter = ','
    )]
    pub brokers: Vec<String>,

    /// Consumer group ID
    #[arg(long, env = "KAFKA_GROUP_ID", default_value = "kafka-connector")]
    pub group_id: String,

    /// SASL username (carried, not applied: the connector talks plaintext)
    #[arg(long, env = "KAFKA_USERNAME")]
    pub username: Option<String>,

    /// SASL password
    #[arg(long, env = "KAFKA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Maximum time between polls, e.g. "10s"; each poll waits this minus 1s
    #[arg(long, default_value = "10s", value_parser = duration_millis_arg)]
    pub max_poll_interval: u64,

    /// Consumer group session timeout, e.g. "10s"
    #[arg(long, default_value = "10s", value_parser = duration_millis_arg)]
    pub session_timeout: u64,

    /// Upper bound on a single publish delivery, e.g. "5s"
    #[arg(long, default_value = "5s", value_parser = duration_millis_arg)]
    pub message_timeout: u64,

    /// Directory for the daily diagnostics log (defaults to the system temp dir)
    #[arg(long, env = "KAFKA_CONNECTOR_LOG_PATH")]
    pub log_path: Option<PathBuf>,

    /// TOML config file; its [connection] section replaces the flags above
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl ConnectionOpts {
    /// Parameters built from the flags alone.
    pub fn to_parameters(&self) -> ConnectionParameters {
        let mut params = ConnectionParameters::new(self.brokers.clone(), self.group_id.clone())
            .with_max_poll_interval_ms(self.max_poll_interval)
            .with_session_timeout_ms(self.session_timeout)
            .with_message_timeout_ms(self.message_timeout);
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            params = params.with_credentials(username.clone(), password.clone());
        }
        params
    }

    /// Resolve parameters and options, reading `--config` when given.
    ///
    /// `--log-path` on the command line wins over the file's `log_path`.
    pub fn resolve(&self) -> anyhow::Result<(ConnectionParameters, ConnectorOptions)> {
        let (params, mut options) = match &self.config {
            Some(path) => {
                let config = ConnectorConfig::from_file(path)?;
                (config.connection, config.options)
            }
            None => (self.to_parameters(), ConnectorOptions::default()),
        };
        if self.log_path.is_some() {
            options.log_path = self.log_path.clone();
        }
        Ok((params, options))
    }
}
