//! Kafka read path for kafka-connector.
//!
//! This crate provides:
//! - [`TopicDrainer`] - drains every currently available message of a topic,
//!   storing each message's offset before it joins the batch
//! - [`ConnectivityProbe`] - one bounded poll to tell whether the broker is
//!   reachable
//!
//! Both talk to the broker through the [`BrokerConsumer`] / [`ConsumerFactory`]
//! capability traits. [`RdkafkaConsumerFactory`] is the production
//! implementation; [`testing::ScriptedBroker`] replays scripted broker events.
//!
//! # Error policy while draining
//!
//! - Transport errors (unreachable broker, rejected subscription) arrive on
//!   the error channel and are logged. The drain simply sees empty polls.
//! - Per-message errors (undecodable record, failed offset store, consume
//!   error) are logged and the message is skipped. An unbroken run of consume
//!   errors ends the drain like an empty poll.
//! - Cancellation stops the loop and is the only error reported back in the
//!   [`kafka_types::DrainResult`].

pub mod broker;
pub mod drainer;
pub mod error;
pub mod probe;
pub mod rdkafka_consumer;
pub mod record;
pub mod testing;


pub use broker::{BrokerConsumer, ClosingConsumer, ConsumerFactory};
pub use drainer::{TopicDrainer, MAX_CONSECUTIVE_ERRORS};
pub use error::{ConsumeError, TransformError};
pub use probe::ConnectivityProbe;
pub use rdkafka_consumer::{RdkafkaConsumer, RdkafkaConsumerFactory, DEFAULT_POLL_SLICE};
pub use record::Record;
