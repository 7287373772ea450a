use thiserror::Error;

/// Errors reported by a [`crate::BrokerConsumer`] while a subscription is open.
///
/// Apart from `Cancelled`, none of these end a drain: they are logged and the
/// loop moves on to the next poll.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsumeError {
    #[error("Failed to subscribe: {0}")]
    Subscribe(String),

    #[error("Error receiving message: {0}")]
    Consume(String),

    #[error("Failed to store offset {offset}: {reason}")]
    StoreOffset { offset: i64, reason: String },

    #[error("Polling cancelled: {0}")]
    Cancelled(String),

    #[error("Consumer already closed")]
    Closed,
}

/// A record that could not be turned into an [`kafka_types::InboundMessage`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("{field} at offset {offset} is not valid UTF-8: {reason}")]
    InvalidUtf8 {
        field: &'static str,
        offset: i64,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ConsumeError>;
