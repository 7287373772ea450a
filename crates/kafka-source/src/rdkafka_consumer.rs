//! rdkafka-backed [`BrokerConsumer`].

use kafka_connector_client::{
    client_config, ensure_ready, ClientRole, ErrorListener, ListeningContext,
};
use kafka_types::{ConnectionParameters, ConnectorError};
use rdkafka::consumer::{BaseConsumer, Consumer as RdkafkaConsumerExt};
use rdkafka::message::{BorrowedMessage, Message as RdkafkaMessage};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::broker::{BrokerConsumer, ConsumerFactory};
use crate::error::{ConsumeError, Result};
use crate::record::Record;

/// Longest single wait inside [`BrokerConsumer::poll`]; cancellation is
/// checked between slices.
pub const DEFAULT_POLL_SLICE: Duration = Duration::from_millis(100);

/// Kafka consumer on top of an rdkafka `BaseConsumer`.
///
/// Offsets are stored explicitly via [`BrokerConsumer::store_offset`] and
/// committed by the client's auto-commit.
pub struct RdkafkaConsumer {
    consumer: Option<BaseConsumer<ListeningContext>>,
    poll_slice: Duration,
}

impl RdkafkaConsumer {
    fn inner(&self) -> Result<&BaseConsumer<ListeningContext>> {
        self.consumer.as_ref().ok_or(ConsumeError::Closed)
    }
}

fn to_record(msg: &BorrowedMessage<'_>) -> Record {
    Record {
        topic: msg.topic().to_string(),
        partition: msg.partition(),
        offset: msg.offset(),
        timestamp: msg.timestamp().to_millis(),
        key: msg.key().map(|k| k.to_vec()),
        payload: msg.payload().map(|p| p.to_vec()),
    }
}

impl BrokerConsumer for RdkafkaConsumer {
    fn subscribe(&mut self, topic: &str) -> Result<()> {
        self.inner()?
            .subscribe(&[topic])
            .map_err(|e| ConsumeError::Subscribe(e.to_string()))
    }

    fn poll(&mut self, timeout: Duration, cancel: &CancellationToken) -> Result<Option<Record>> {
        let consumer = self.inner()?;
        // An unrepresentable deadline means "wait until cancelled".
        let deadline = Instant::now().checked_add(timeout);

        loop {
            if cancel.is_cancelled() {
                return Err(ConsumeError::Cancelled(
                    "cancellation requested while polling".to_string(),
                ));
            }

            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => self.poll_slice,
            };
            if remaining.is_zero() {
                return Ok(None);
            }

            match consumer.poll(remaining.min(self.poll_slice)) {
                None => continue,
                Some(Ok(msg)) => return Ok(Some(to_record(&msg))),
                Some(Err(e)) => return Err(ConsumeError::Consume(e.to_string())),
            }
        }
    }

    fn store_offset(&mut self, record: &Record) -> Result<()> {
        // The stored position is the next offset to read.
        self.inner()?
            .store_offset(&record.topic, record.partition, record.offset + 1)
            .map_err(|e| ConsumeError::StoreOffset {
                offset: record.offset,
                reason: e.to_string(),
            })
    }

    fn close(&mut self) {
        if let Some(consumer) = self.consumer.take() {
            consumer.unsubscribe();
            // Dropping the consumer leaves the group and commits stored offsets.
            drop(consumer);
        }
    }
}

/// Creates [`RdkafkaConsumer`]s.
#[derive(Debug, Clone)]
pub struct RdkafkaConsumerFactory {
    poll_slice: Duration,
}

impl Default for RdkafkaConsumerFactory {
    fn default() -> Self {
        Self {
            poll_slice: DEFAULT_POLL_SLICE,
        }
    }
}

impl RdkafkaConsumerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_slice(mut self, slice: Duration) -> Self {
        self.poll_slice = slice.max(Duration::from_millis(1));
        self
    }
}

impl ConsumerFactory for RdkafkaConsumerFactory {
    type Consumer = RdkafkaConsumer;

    fn create(
        &self,
        params: &ConnectionParameters,
        role: ClientRole,
        on_error: ErrorListener,
    ) -> kafka_types::Result<RdkafkaConsumer> {
        ensure_ready()?;
        params.validate_consumer()?;

        let consumer: BaseConsumer<ListeningContext> = client_config(params, role)
            .create_with_context(ListeningContext::new(on_error))
            .map_err(|e| ConnectorError::Client(format!("Failed to create consumer: {e}")))?;

        Ok(RdkafkaConsumer {
            consumer: Some(consumer),
            poll_slice: self.poll_slice,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConnectivityProbe;
    use std::sync::Arc;
    use std::thread;

    /// Nothing listens on port 1.
    fn unreachable() -> ConnectionParameters {
        ConnectionParameters::new(vec!["127.0.0.1:1".to_string()], "unreachable-group")
            .with_max_poll_interval_ms(3_000)
            .with_session_timeout_ms(3_000)
    }

    fn consumer(role: ClientRole) -> RdkafkaConsumer {
        RdkafkaConsumerFactory::new()
            .create(&unreachable(), role, Arc::new(|_: &str| {}))
            .unwrap()
    }

    #[test]
    fn test_poll_with_cancelled_token_returns_cancelled() {
        let mut consumer = consumer(ClientRole::Drain);
        consumer.subscribe("orders").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = consumer.poll(Duration::from_secs(5), &cancel);

        assert!(matches!(result, Err(ConsumeError::Cancelled(_))));
    }

    #[test]
    fn test_poll_returns_nothing_within_budget() {
        let mut consumer = consumer(ClientRole::Drain);
        consumer.subscribe("orders").unwrap();
        let started = Instant::now();

        let result = consumer.poll(Duration::from_millis(200), &CancellationToken::new());

        assert!(matches!(result, Ok(None)));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(200), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(200) + DEFAULT_POLL_SLICE * 5, "{elapsed:?}");
    }

    #[test]
    fn test_cancellation_is_seen_between_slices() {
        let mut consumer = consumer(ClientRole::Drain);
        consumer.subscribe("orders").unwrap();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(150));
            trigger.cancel();
        });
        let started = Instant::now();

        let result = consumer.poll(Duration::from_secs(30), &cancel);

        canceller.join().unwrap();
        assert!(matches!(result, Err(ConsumeError::Cancelled(_))));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_unbounded_budget_still_observes_cancellation() {
        let mut consumer = consumer(ClientRole::Drain);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(150));
            trigger.cancel();
        });

        let result = consumer.poll(Duration::MAX, &cancel);

        canceller.join().unwrap();
        assert!(matches!(result, Err(ConsumeError::Cancelled(_))));
    }

    #[test]
    fn test_close_is_idempotent_and_final() {
        let mut consumer = consumer(ClientRole::Drain);
        consumer.subscribe("orders").unwrap();

        consumer.close();
        consumer.close();

        assert!(matches!(
            consumer.poll(Duration::from_millis(10), &CancellationToken::new()),
            Err(ConsumeError::Closed)
        ));
        assert!(matches!(consumer.subscribe("orders"), Err(ConsumeError::Closed)));
    }

    #[test]
    fn test_store_offset_without_assignment_fails() {
        let mut consumer = consumer(ClientRole::Drain);
        consumer.subscribe("orders").unwrap();
        let record = Record::new("orders", 0, 41);

        let err = consumer.store_offset(&record).unwrap_err();

        assert!(matches!(err, ConsumeError::StoreOffset { offset: 41, .. }));
    }

    #[test]
    fn test_factory_rejects_missing_group() {
        let params = ConnectionParameters::new(vec!["127.0.0.1:1".to_string()], "");
        let result = RdkafkaConsumerFactory::new().create(
            &params,
            ClientRole::Drain,
            Arc::new(|_: &str| {}),
        );
        assert!(matches!(result, Err(ConnectorError::InvalidConfig(_))));
    }

    #[test]
    fn test_check_connection_unreachable_broker_is_unhealthy() {
        let checker = ConnectivityProbe::new(RdkafkaConsumerFactory::new());
        assert!(!checker.check_connection(&unreachable(), "orders"));
    }
}
