//! Error types for the connector crates.

use thiserror::Error;

/// Errors raised before or around a connector operation.
///
/// Errors that belong to a single message (a malformed record, a failed offset
/// store) never surface as a `ConnectorError`: the drain loop logs and skips
/// them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Kafka client error: {0}")]
    Client(String),

    #[error("Transport not available: {0}")]
    Transport(String),
}

/// Result type alias for connector operations.
pub type Result<T> = std::result::Result<T, ConnectorError>;
