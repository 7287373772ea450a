//! kafka-connector
//!
//! A small Kafka connector exposing three operations:
//!
//! - Drain: read every message currently available on a topic, storing each
//!   message's offset before it is handed back
//! - Check: tell whether a broker can be reached and subscribed to
//! - Publish: send one message and report the broker's verdict
//!
//! # Crates
//!
//! - `kafka_types` - connection parameters, drained messages, outcomes
//! - `kafka_connector_client` - rdkafka client configuration and transport readiness
//! - `kafka_connector_source` - drain loop and connectivity probe
//! - `kafka_connector_producer` - single-message publisher
//! - `kafka_connector_diagnostics` - per-day diagnostics log
//!
//! # CLI Usage
//!
//! ```bash
//! # Drain a topic and print the messages as JSON
//! kafka-connector drain --brokers localhost:9092 --group-id reader orders
//!
//! # Probe the broker
//! kafka-connector check --brokers localhost:9092 orders
//!
//! # Publish one keyed message
//! kafka-connector publish --brokers localhost:9092 orders '{"id":42}' --key order-42
//! ```

pub mod config;
mod connector;

pub use config::{ConnectionOpts, ConnectorConfig};
pub use connector::Connector;
pub use kafka_types::{
    ConnectionParameters, ConnectorError, ConnectorOptions, DrainResult, InboundMessage,
    PublishOutcome, ResponseEnvelope,
};
