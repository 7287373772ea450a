//! Broker connection parameters.

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::error::{ConnectorError, Result};

/// Amount subtracted from the max poll interval to get the per-poll budget.
///
/// A poll must return before the broker considers the consumer stalled and
/// evicts it from the group.
pub const POLL_SAFETY_MARGIN_MS: u64 = 1000;

/// Credentials carried with the parameters.
///
/// They are accepted and kept but never applied to the transport: the
/// connector always talks plaintext.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection parameters for every connector operation.
///
/// Owned by the caller and passed by reference; none of the operations mutate
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionParameters {
    /// Kafka brokers (`host:port`)
    pub brokers: Vec<String>,
    /// Consumer group ID
    pub group_id: String,
    pub credentials: Option<Credentials>,
    /// Maximum bytes fetched per fetch request
    pub fetch_max_bytes: u64,
    /// Maximum size of a single message
    pub message_max_bytes: u64,
    /// Maximum size of a broker response
    pub receive_message_max_bytes: u64,
    /// Maximum allowed time between polls before the consumer is evicted
    pub max_poll_interval_ms: u64,
    /// Consumer group session timeout
    pub session_timeout_ms: u64,
    /// Upper bound on a single publish delivery
    pub message_timeout_ms: u64,
}

impl Default for ConnectionParameters {
    fn default() -> Self {
        Self {
            brokers: vec!["localhost:9092".to_string()],
            group_id: "kafka-connector".to_string(),
            credentials: None,
            fetch_max_bytes: 1_800_000_000,
            message_max_bytes: 1_000_000_000,
            receive_message_max_bytes: 1_850_000_000,
            max_poll_interval_ms: 10_000,
            session_timeout_ms: 10_000,
            message_timeout_ms: 5_000,
        }
    }
}

impl ConnectionParameters {
    pub fn new(brokers: Vec<String>, group_id: impl Into<String>) -> Self {
        Self {
            brokers,
            group_id: group_id.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_max_poll_interval_ms(mut self, ms: u64) -> Self {
        self.max_poll_interval_ms = ms;
        self
    }

    pub fn with_session_timeout_ms(mut self, ms: u64) -> Self {
        self.session_timeout_ms = ms;
        self
    }

    pub fn with_message_timeout_ms(mut self, ms: u64) -> Self {
        self.message_timeout_ms = ms;
        self
    }

    /// Comma-separated broker list, as librdkafka expects it.
    pub fn bootstrap_servers(&self) -> String {
        self.brokers
            .iter()
            .map(|b| b.trim())
            .filter(|b| !b.is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Bound for a single poll: the max poll interval minus the safety margin.
    ///
    /// Never shorter than one millisecond.
    pub fn poll_budget(&self) -> Duration {
        let ms = self
            .max_poll_interval_ms
            .saturating_sub(POLL_SAFETY_MARGIN_MS)
            .max(1);
        Duration::from_millis(ms)
    }

    pub fn message_timeout(&self) -> Duration {
        Duration::from_millis(self.message_timeout_ms)
    }

    /// Reject parameters no broker client could work with.
    pub fn validate(&self) -> Result<()> {
        if self.bootstrap_servers().is_empty() {
            return Err(ConnectorError::InvalidConfig(
                "broker list is empty".to_string(),
            ));
        }
        if self.message_max_bytes > self.fetch_max_bytes {
            return Err(ConnectorError::InvalidConfig(format!(
                "message_max_bytes ({}) exceeds fetch_max_bytes ({})",
                self.message_max_bytes, self.fetch_max_bytes
            )));
        }
        Ok(())
    }

    /// [`Self::validate`], plus the consumer group a consumer needs.
    pub fn validate_consumer(&self) -> Result<()> {
        self.validate()?;
        if self.group_id.trim().is_empty() {
            return Err(ConnectorError::InvalidConfig(
                "consumer group id is empty".to_string(),
            ));
        }
        Ok(())
    }
}
