//! In-memory producers for exercising the publisher without Kafka.

use kafka_types::ConnectionParameters;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::broker::{BrokerProducer, ProducerFactory, PublishError};

/// A record handed to a scripted producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentRecord {
    pub topic: String,
    pub key: Option<String>,
    pub value: String,
    pub timeout: Duration,
}

#[derive(Debug, Default)]
struct ProducerState {
    sent: Vec<SentRecord>,
    failure: Option<String>,
    created: usize,
    dropped: usize,
}

/// Factory of scripted producers. Every send succeeds unless
/// [`ScriptedProducers::fail_with`] set a delivery failure.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProducers {
    state: Arc<Mutex<ProducerState>>,
}

impl ScriptedProducers {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ProducerState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Make every following delivery fail with `reason`.
    pub fn fail_with(&self, reason: &str) -> &Self {
        self.state().failure = Some(reason.to_string());
        self
    }

    /// Records whose delivery succeeded.
    pub fn sent(&self) -> Vec<SentRecord> {
        self.state().sent.clone()
    }

    pub fn created_count(&self) -> usize {
        self.state().created
    }

    pub fn dropped_count(&self) -> usize {
        self.state().dropped
    }
}

pub struct ScriptedProducer {
    factory: ScriptedProducers,
}

impl BrokerProducer for ScriptedProducer {
    fn send(
        &mut self,
        topic: &str,
        key: Option<&str>,
        value: &str,
        timeout: Duration,
    ) -> Result<(), PublishError> {
        let mut state = self.factory.state();
        if let Some(reason) = state.failure.clone() {
            return Err(PublishError::Delivery(reason));
        }
        state.sent.push(SentRecord {
            topic: topic.to_string(),
            key: key.map(str::to_string),
            value: value.to_string(),
            timeout,
        });
        Ok(())
    }
}

impl Drop for ScriptedProducer {
    fn drop(&mut self) {
        self.factory.state().dropped += 1;
    }
}

impl ProducerFactory for ScriptedProducers {
    type Producer = ScriptedProducer;

    fn create(&self, params: &ConnectionParameters) -> kafka_types::Result<ScriptedProducer> {
        params.validate()?;
        self.state().created += 1;
        Ok(ScriptedProducer {
            factory: self.clone(),
        })
    }
}
