//! Capability interface over the broker producer.

use kafka_types::ConnectionParameters;
use std::time::Duration;
use thiserror::Error;

/// Why a single send did not go through.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("Failed to enqueue message: {0}")]
    Enqueue(String),

    /// Failure reported by the broker in the delivery report
    #[error("{0}")]
    Delivery(String),

    #[error("Failed to flush producer: {0}")]
    Flush(String),

    #[error("Delivery not confirmed within {0:?}")]
    Unconfirmed(Duration),
}

/// A producer handle used for exactly one send.
pub trait BrokerProducer {
    /// Send one record and block until its delivery is confirmed or fails,
    /// waiting at most `timeout`. `key == None` sends a record without a key.
    fn send(
        &mut self,
        topic: &str,
        key: Option<&str>,
        value: &str,
        timeout: Duration,
    ) -> Result<(), PublishError>;
}

/// Creates one [`BrokerProducer`] per publish.
pub trait ProducerFactory {
    type Producer: BrokerProducer;

    fn create(&self, params: &ConnectionParameters) -> kafka_types::Result<Self::Producer>;
}
