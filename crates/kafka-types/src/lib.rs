//! Shared types for kafka-connector.
//!
//! This crate holds the plain value types exchanged between the caller and the
//! connector operations. It has no dependency on the broker client so that the
//! source, producer and CLI crates can share it freely.
//!
//! # Modules
//!
//! - [`params`] - Broker connection parameters and their tunable limits
//! - [`message`] - Drained messages, the drain result and its response envelope
//! - [`outcome`] - Publish outcome
//! - [`options`] - Connector variant options (key, log path, envelope)
//! - [`error`] - Error types shared by all connector crates

pub mod error;
pub mod message;
pub mod options;
pub mod outcome;
pub mod params;

pub use error::{ConnectorError, Result};
pub use message::{DrainResult, InboundMessage, ResponseEnvelope};
pub use options::ConnectorOptions;
pub use outcome::PublishOutcome;
pub use params::{ConnectionParameters, Credentials, POLL_SAFETY_MARGIN_MS};
