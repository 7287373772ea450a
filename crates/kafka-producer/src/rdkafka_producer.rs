//! rdkafka-backed [`BrokerProducer`].

use kafka_connector_client::{client_config, ensure_ready, ClientRole};
use kafka_types::{ConnectionParameters, ConnectorError};
use rdkafka::client::ClientContext;
use rdkafka::error::KafkaError;
use rdkafka::message::DeliveryResult;
use rdkafka::producer::{BaseProducer, BaseRecord, Producer, ProducerContext};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::broker::{BrokerProducer, ProducerFactory, PublishError};

type DeliverySlot = Arc<OnceLock<Result<(), String>>>;

/// Captures the delivery report of the one record a producer sends.
struct DeliveryContext {
    report: DeliverySlot,
}

impl ClientContext for DeliveryContext {
    fn error(&self, error: KafkaError, reason: &str) {
        tracing::warn!("Kafka producer error: {error}: {reason}");
    }
}

impl ProducerContext for DeliveryContext {
    type DeliveryOpaque = ();

    fn delivery(&self, delivery_result: &DeliveryResult<'_>, _: Self::DeliveryOpaque) {
        let report = match delivery_result {
            Ok(_) => Ok(()),
            Err((err, _)) => Err(err.to_string()),
        };
        let _ = self.report.set(report);
    }
}

/// Producer on top of an rdkafka `BaseProducer`. Delivery reports are served
/// by flushing on the calling thread.
pub struct RdkafkaProducer {
    producer: BaseProducer<DeliveryContext>,
    report: DeliverySlot,
}

impl BrokerProducer for RdkafkaProducer {
    fn send(
        &mut self,
        topic: &str,
        key: Option<&str>,
        value: &str,
        timeout: Duration,
    ) -> Result<(), PublishError> {
        let mut record: BaseRecord<'_, str, str> = BaseRecord::to(topic).payload(value);
        if let Some(key) = key {
            record = record.key(key);
        }

        self.producer
            .send(record)
            .map_err(|(err, _)| PublishError::Enqueue(err.to_string()))?;

        let flushed = self.producer.flush(timeout);

        match self.report.get() {
            Some(Ok(())) => Ok(()),
            Some(Err(reason)) => Err(PublishError::Delivery(reason.clone())),
            None => match flushed {
                Err(e) => Err(PublishError::Flush(e.to_string())),
                Ok(()) => Err(PublishError::Unconfirmed(timeout)),
            },
        }
    }
}

/// Creates [`RdkafkaProducer`]s.
#[derive(Debug, Clone, Default)]
pub struct RdkafkaProducerFactory;

impl RdkafkaProducerFactory {
    pub fn new() -> Self {
        Self
    }
}

impl ProducerFactory for RdkafkaProducerFactory {
    type Producer = RdkafkaProducer;

    fn create(&self, params: &ConnectionParameters) -> kafka_types::Result<RdkafkaProducer> {
        ensure_ready()?;
        params.validate()?;

        let report: DeliverySlot = Arc::new(OnceLock::new());
        let producer: BaseProducer<DeliveryContext> = client_config(params, ClientRole::Producer)
            .create_with_context(DeliveryContext {
                report: Arc::clone(&report),
            })
            .map_err(|e| ConnectorError::Client(format!("Failed to create producer: {e}")))?;

        Ok(RdkafkaProducer { producer, report })
    }
}
