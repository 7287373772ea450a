//! The caller-facing connector.

use kafka_connector_diagnostics::{DailyFileSink, DiagnosticsSink};
use kafka_connector_producer::{MessagePublisher, ProducerFactory, RdkafkaProducerFactory};
use kafka_connector_source::{
    ConnectivityProbe, ConsumerFactory, RdkafkaConsumerFactory, TopicDrainer,
};
use kafka_types::{ConnectionParameters, ConnectorOptions, DrainResult, PublishOutcome};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Bundles connection parameters, connector options and the diagnostics
/// trail behind the three connector operations.
///
/// Each operation opens its own broker client and closes it before
/// returning. Nothing is shared between calls except the cancellation token.
pub struct Connector<C = RdkafkaConsumerFactory, P = RdkafkaProducerFactory>
where
    C: ConsumerFactory + Clone,
    P: ProducerFactory + Clone,
{
    params: ConnectionParameters,
    options: ConnectorOptions,
    consumers: C,
    producers: P,
    sink: Arc<dyn DiagnosticsSink>,
    cancel: CancellationToken,
}

impl Connector {
    /// Connector backed by rdkafka, logging to the daily file under
    /// `options.log_path`.
    pub fn new(params: ConnectionParameters, options: ConnectorOptions) -> Self {
        Self::with_factories(
            params,
            options,
            RdkafkaConsumerFactory::new(),
            RdkafkaProducerFactory::new(),
        )
    }
}

impl<C, P> Connector<C, P>
where
    C: ConsumerFactory + Clone,
    P: ProducerFactory + Clone,
{
    pub fn with_factories(
        params: ConnectionParameters,
        options: ConnectorOptions,
        consumers: C,
        producers: P,
    ) -> Self {
        let sink: Arc<dyn DiagnosticsSink> = Arc::new(DailyFileSink::new(options.log_path.clone()));
        Self {
            params,
            options,
            consumers,
            producers,
            sink,
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the diagnostics sink (the daily log file by default).
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn params(&self) -> &ConnectionParameters {
        &self.params
    }

    pub fn options(&self) -> &ConnectorOptions {
        &self.options
    }

    /// Token that interrupts a running [`Connector::read_messages`].
    ///
    /// Once cancelled it stays cancelled: later drains stop before their
    /// first poll.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Drain every message currently available on `topic`.
    pub fn read_messages(&self, topic: &str) -> kafka_types::Result<DrainResult> {
        TopicDrainer::new(self.consumers.clone())
            .with_sink(Arc::clone(&self.sink))
            .with_include_key(self.options.include_key)
            .with_cancellation(self.cancel.clone())
            .drain(&self.params, topic, self.params.poll_budget())
    }

    /// True when one subscribe-and-poll attempt on `topic` reported no error.
    pub fn check_connection(&self, topic: &str) -> bool {
        ConnectivityProbe::new(self.consumers.clone())
            .with_sink(Arc::clone(&self.sink))
            .check_connection(&self.params, topic)
    }

    /// Publish one message. An empty `key` publishes without a key.
    pub fn publish(&self, topic: &str, value: &str, key: &str) -> PublishOutcome {
        MessagePublisher::new(self.producers.clone())
            .with_sink(Arc::clone(&self.sink))
            .publish(&self.params, topic, value, key)
    }

    /// JSON form of a drain result: the bare message list, or the
    /// `{success, error, messages}` envelope when `wrap_in_envelope` is set.
    pub fn render(&self, result: &DrainResult) -> serde_json::Result<serde_json::Value> {
        if self.options.wrap_in_envelope {
            serde_json::to_value(result.clone().into_envelope())
        } else {
            serde_json::to_value(result.messages())
        }
    }
}
