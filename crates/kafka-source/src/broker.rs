//! Capability interface over the broker client.
//!
//! The drain loop and the probe only talk to these traits. The rdkafka-backed
//! implementation lives in [`crate::rdkafka_consumer`], an in-memory one in
//! [`crate::testing`].

use kafka_connector_client::{ClientRole, ErrorListener};
use kafka_types::ConnectionParameters;
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::record::Record;

/// A consumer handle scoped to a single operation.
pub trait BrokerConsumer {
    fn subscribe(&mut self, topic: &str) -> Result<()>;

    /// Wait up to `timeout` for the next record.
    ///
    /// `Ok(None)` means nothing arrived within the bound. Implementations
    /// return [`crate::ConsumeError::Cancelled`] as soon as `cancel` fires.
    fn poll(&mut self, timeout: Duration, cancel: &CancellationToken) -> Result<Option<Record>>;

    /// Record that `record` has been consumed, so that the next commit
    /// advances past it.
    fn store_offset(&mut self, record: &Record) -> Result<()>;

    /// Leave the group and release the handle. Idempotent.
    fn close(&mut self);
}

/// Creates one [`BrokerConsumer`] per operation.
pub trait ConsumerFactory {
    type Consumer: BrokerConsumer;

    /// `on_error` receives every transport-level error the client reports
    /// while the consumer is alive.
    fn create(
        &self,
        params: &ConnectionParameters,
        role: ClientRole,
        on_error: ErrorListener,
    ) -> kafka_types::Result<Self::Consumer>;
}

/// Closes the wrapped consumer when dropped, so every exit path releases it.
pub struct ClosingConsumer<C: BrokerConsumer> {
    inner: C,
    closed: bool,
}

impl<C: BrokerConsumer> ClosingConsumer<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            closed: false,
        }
    }

    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.inner.close();
        }
    }
}

impl<C: BrokerConsumer> Deref for ClosingConsumer<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C: BrokerConsumer> DerefMut for ClosingConsumer<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.inner
    }
}

impl<C: BrokerConsumer> Drop for ClosingConsumer<C> {
    fn drop(&mut self) {
        self.close();
    }
}
