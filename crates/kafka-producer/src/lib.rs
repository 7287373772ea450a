//! Kafka write path for kafka-connector.
//!
//! [`MessagePublisher`] sends one message per call and reports the outcome as
//! a [`kafka_types::PublishOutcome`]: empty on success, the broker's reason
//! otherwise. No error crosses this boundary as a `Result`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kafka_connector_producer::{MessagePublisher, RdkafkaProducerFactory};
//! use kafka_types::ConnectionParameters;
//!
//! let params = ConnectionParameters::new(vec!["localhost:9092".to_string()], "orders-writer");
//! let publisher = MessagePublisher::new(RdkafkaProducerFactory::new());
//!
//! let outcome = publisher.publish(&params, "orders", r#"{"id":42}"#, "order-42");
//! if let Some(reason) = outcome.reason() {
//!     eprintln!("publish failed: {reason}");
//! }
//! ```

pub mod broker;
pub mod publisher;
pub mod rdkafka_producer;

// Scripted producers for tests
pub mod testing;

pub use broker::{BrokerProducer, ProducerFactory, PublishError};
pub use publisher::{MessagePublisher, DELIVERY_REPORT_MARGIN};
pub use rdkafka_producer::{RdkafkaProducer, RdkafkaProducerFactory};
