//! Broker client plumbing shared by the kafka-connector source and producer.
//!
//! - [`config`] - Builds rdkafka client configurations from
//!   [`kafka_types::ConnectionParameters`] for each client role
//! - [`context`] - Client context that forwards transport errors to an
//!   [`ErrorListener`]
//! - [`transport`] - Once-per-process check that the native transport is
//!   usable on this platform

pub mod config;
pub mod context;
pub mod transport;

pub use config::{client_config, ClientRole};
pub use context::{ErrorListener, ListeningContext};
pub use transport::{ensure_ready, Platform, TransportInfo};
