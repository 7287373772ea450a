//! Broker reachability check.

use kafka_connector_client::{ClientRole, ErrorListener};
use kafka_connector_diagnostics::{Diagnostics, DiagnosticsSink, NullSink};
use kafka_types::ConnectionParameters;
use std::sync::{Arc, OnceLock};
use tokio_util::sync::CancellationToken;

use crate::broker::{BrokerConsumer, ClosingConsumer, ConsumerFactory};

/// Subscribes and performs exactly one bounded poll.
///
/// Healthy means no error was reported during that attempt. An empty topic is
/// still healthy: the probe shows the broker can be reached and subscribed
/// to, nothing more.
pub struct ConnectivityProbe<F: ConsumerFactory> {
    factory: F,
    sink: Arc<dyn DiagnosticsSink>,
}

impl<F: ConsumerFactory> ConnectivityProbe<F> {
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

    pub fn check_connection(&self, params: &ConnectionParameters, topic: &str) -> bool {
        let log = Diagnostics::new(Arc::clone(&self.sink), format!("check topic={topic}"));

        // First reported error wins; later ones are only logged.
        let failure: Arc<OnceLock<String>> = Arc::new(OnceLock::new());
        let slot = Arc::clone(&failure);
        let channel_log = log.clone();
        let on_error: ErrorListener = Arc::new(move |reason: &str| {
            channel_log.warn(format!("connection error: {reason}"));
            let _ = slot.set(reason.to_string());
        });

        self.probe(params, topic, on_error, &log);

        match failure.get() {
            Some(reason) => {
                log.info(format!("unhealthy: {reason}"));
                false
            }
            None => {
                log.info("healthy");
                true
            }
        }
    }

    fn probe(
        &self,
        params: &ConnectionParameters,
        topic: &str,
        on_error: ErrorListener,
        log: &Diagnostics,
    ) {
        if topic.trim().is_empty() {
            on_error("topic must not be empty");
            return;
        }

        let consumer = match self.factory.create(params, ClientRole::Probe, on_error.clone()) {
            Ok(consumer) => consumer,
            Err(e) => {
                on_error(&e.to_string());
                return;
            }
        };
        let mut consumer = ClosingConsumer::new(consumer);

        if let Err(e) = consumer.subscribe(topic) {
            on_error(&e.to_string());
            return;
        }

        match consumer.poll(params.poll_budget(), &CancellationToken::new()) {
            Ok(Some(record)) => log.debug(format!("received message {}", record.offset)),
            Ok(None) => log.debug("no message within the poll budget"),
            Err(e) => on_error(&e.to_string()),
        }
    }
}
