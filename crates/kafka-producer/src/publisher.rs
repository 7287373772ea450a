//! Single-message publisher.

use kafka_connector_diagnostics::{Diagnostics, DiagnosticsSink, NullSink};
use kafka_types::{ConnectionParameters, PublishOutcome};
use std::sync::Arc;
use std::time::Duration;

use crate::broker::{BrokerProducer, ProducerFactory};

/// Extra time granted on top of `message.timeout.ms`, so that the client's
/// own delivery timeout is reported before the wait gives up.
pub const DELIVERY_REPORT_MARGIN: Duration = Duration::from_secs(1);

/// Publishes one message per call.
///
/// A fresh producer is built for every publish and dropped right after; no
/// connection is reused between calls, and nothing is retried.
pub struct MessagePublisher<F: ProducerFactory> {
    factory: F,
    sink: Arc<dyn DiagnosticsSink>,
}

impl<F: ProducerFactory> MessagePublisher<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            sink: Arc::new(NullSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Publish `value` to `topic`. An empty `key` sends the record without a
    /// key.
    ///
    /// Returns an empty outcome on success, otherwise the failure reason.
    pub fn publish(
        &self,
        params: &ConnectionParameters,
        topic: &str,
        value: &str,
        key: &str,
    ) -> PublishOutcome {
        let log = Diagnostics::new(Arc::clone(&self.sink), format!("publish topic={topic}"));

        if topic.trim().is_empty() {
            let outcome = PublishOutcome::failure("topic must not be empty");
            log.error(outcome.as_str());
            return outcome;
        }

        let mut producer = match self.factory.create(params) {
            Ok(producer) => producer,
            Err(e) => {
                log.error(format!("could not create producer: {e}"));
                return PublishOutcome::failure(e.to_string());
            }
        };

        let key = if key.is_empty() { None } else { Some(key) };
        let timeout = params.message_timeout() + DELIVERY_REPORT_MARGIN;

        let outcome = match producer.send(topic, key, value, timeout) {
            Ok(()) => {
                log.info(format!("published {} byte(s)", value.len()));
                PublishOutcome::success()
            }
            Err(e) => {
                log.error(format!("publish failed: {e}"));
                PublishOutcome::failure(e.to_string())
            }
        };

        drop(producer);
        outcome
    }
}
