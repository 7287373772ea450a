//! In-memory broker for exercising the drain loop and the probe without Kafka.
//!
//! A [`ScriptedBroker`] replays a queue of [`Step`]s: each `poll` consumes
//! steps until one of them produces a poll result. Everything the consumer is
//! asked to do (subscriptions, stored offsets, poll budgets, closes) is
//! recorded for assertions.

use kafka_connector_client::{ClientRole, ErrorListener};
use kafka_types::{ConnectionParameters, ConnectorError};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::broker::{BrokerConsumer, ConsumerFactory};
use crate::error::{ConsumeError, Result};
use crate::record::Record;

/// One scripted broker event.
#[derive(Debug, Clone)]
pub enum Step {
    /// `poll` returns this record
    Record(Record),
    /// `poll` returns nothing, as if the budget ran out
    Empty,
    /// The error listener fires; `poll` moves on to the next step
    TransportError(String),
    /// `poll` returns a per-message consumption error
    ConsumeError(String),
    /// The cancellation token is triggered during `poll`
    Cancel,
}

#[derive(Debug, Default)]
struct BrokerState {
    steps: VecDeque<Step>,
    subscriptions: Vec<String>,
    roles: Vec<ClientRole>,
    poll_budgets: Vec<Duration>,
    stored_offsets: Vec<i64>,
    fail_store: HashSet<i64>,
    fail_subscribe: Option<String>,
    fail_create: Option<String>,
    created: usize,
    closed: usize,
}

/// Scripted broker; also the [`ConsumerFactory`] handing out its consumers.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBroker {
    state: Arc<Mutex<BrokerState>>,
}

impl ScriptedBroker {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, BrokerState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn push(&self, step: Step) -> &Self {
        self.state().steps.push_back(step);
        self
    }

    /// Queue one text record per `(offset, key, value)` on partition 0.
    pub fn with_messages(self, topic: &str, messages: &[(i64, &str, &str)]) -> Self {
        for (offset, key, value) in messages {
            let record = Record::new(topic, 0, *offset)
                .with_timestamp(1_700_000_000_000 + offset)
                .with_key(key.as_bytes())
                .with_payload(value.as_bytes());
            self.push(Step::Record(record));
        }
        self
    }

    pub fn fail_store_for(&self, offset: i64) -> &Self {
        self.state().fail_store.insert(offset);
        self
    }

    pub fn fail_subscribe(&self, reason: &str) -> &Self {
        self.state().fail_subscribe = Some(reason.to_string());
        self
    }

    pub fn fail_create(&self, reason: &str) -> &Self {
        self.state().fail_create = Some(reason.to_string());
        self
    }

    pub fn subscriptions(&self) -> Vec<String> {
        self.state().subscriptions.clone()
    }

    pub fn roles(&self) -> Vec<ClientRole> {
        self.state().roles.clone()
    }

    pub fn poll_budgets(&self) -> Vec<Duration> {
        self.state().poll_budgets.clone()
    }

    /// Offsets of the records whose offset was stored, in store order.
    pub fn stored_offsets(&self) -> Vec<i64> {
        self.state().stored_offsets.clone()
    }

    pub fn created_count(&self) -> usize {
        self.state().created
    }

    pub fn closed_count(&self) -> usize {
        self.state().closed
    }

    pub fn remaining_steps(&self) -> usize {
        self.state().steps.len()
    }
}

/// Consumer handed out by [`ScriptedBroker`].
pub struct ScriptedConsumer {
    broker: ScriptedBroker,
    on_error: ErrorListener,
    closed: bool,
}

impl BrokerConsumer for ScriptedConsumer {
    fn subscribe(&mut self, topic: &str) -> Result<()> {
        let mut state = self.broker.state();
        if let Some(reason) = state.fail_subscribe.clone() {
            return Err(ConsumeError::Subscribe(reason));
        }
        state.subscriptions.push(topic.to_string());
        Ok(())
    }

    fn poll(&mut self, timeout: Duration, cancel: &CancellationToken) -> Result<Option<Record>> {
        if self.closed {
            return Err(ConsumeError::Closed);
        }
        self.broker.state().poll_budgets.push(timeout);

        loop {
            if cancel.is_cancelled() {
                return Err(ConsumeError::Cancelled(
                    "cancellation requested while polling".to_string(),
                ));
            }

            // Release the lock before calling back into the listener.
            let step = self.broker.state().steps.pop_front();
            match step {
                None | Some(Step::Empty) => return Ok(None),
                Some(Step::Record(record)) => return Ok(Some(record)),
                Some(Step::TransportError(reason)) => (self.on_error)(&reason),
                Some(Step::ConsumeError(reason)) => return Err(ConsumeError::Consume(reason)),
                Some(Step::Cancel) => cancel.cancel(),
            }
        }
    }

    fn store_offset(&mut self, record: &Record) -> Result<()> {
        let mut state = self.broker.state();
        if state.fail_store.contains(&record.offset) {
            return Err(ConsumeError::StoreOffset {
                offset: record.offset,
                reason: "Local: Erroneous state".to_string(),
            });
        }
        state.stored_offsets.push(record.offset);
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.broker.state().closed += 1;
        }
    }
}

impl ConsumerFactory for ScriptedBroker {
    type Consumer = ScriptedConsumer;

    fn create(
        &self,
        params: &ConnectionParameters,
        role: ClientRole,
        on_error: ErrorListener,
    ) -> kafka_types::Result<ScriptedConsumer> {
        params.validate_consumer()?;
        {
            let mut state = self.state();
            if let Some(reason) = state.fail_create.clone() {
                return Err(ConnectorError::Client(reason));
            }
            state.created += 1;
            state.roles.push(role);
        }
        Ok(ScriptedConsumer {
            broker: self.clone(),
            on_error,
            closed: false,
        })
    }
}
