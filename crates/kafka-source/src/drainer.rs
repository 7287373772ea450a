//! Drain-to-exhaustion consumption.
//!
//! The drainer subscribes to a topic and polls until a poll comes back empty,
//! collecting every message whose offset it managed to store:
//!
//! ```text
//! subscribe ──► poll ──┬─ record ──► transform ──► store offset ──► append ──┐
//!                 ▲    │                 │              │                    │
//!                 │    │               error          error                  │
//!                 │    │                 └──── log, skip ◄┘                  │
//!                 │    ├─ consume error ──► log, skip                        │
//!                 └────┴─────────────────────────────────────────────────────┘
//!                      ├─ nothing within budget ──► close, return batch
//!                      └─ cancelled ──► close, return partial batch + error
//! ```
//!
//! A single empty poll counts as "caught up": the drainer is a batch reader,
//! not a stream processor, so a message produced right after the empty poll
//! is left for the next drain. An empty poll caused by a broker hiccup looks
//! the same and is treated the same.
//!
//! A run of consume errors with no record in between ends the drain the same
//! way once it has lasted a full poll budget or reached
//! [`MAX_CONSECUTIVE_ERRORS`].

use kafka_connector_client::{ClientRole, ErrorListener};
use kafka_connector_diagnostics::{Diagnostics, DiagnosticsSink, NullSink};
use kafka_types::{ConnectionParameters, ConnectorError, DrainResult, InboundMessage, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::broker::{BrokerConsumer, ClosingConsumer, ConsumerFactory};
use crate::error::ConsumeError;
use crate::record::Record;

/// Upper bound on back-to-back consume errors within one drain.
pub const MAX_CONSECUTIVE_ERRORS: usize = 100;

/// Consume errors seen since the last record.
struct ErrorStreak {
    count: usize,
    since: Option<Instant>,
}

impl ErrorStreak {
    fn new() -> Self {
        Self {
            count: 0,
            since: None,
        }
    }

    fn reset(&mut self) {
        self.count = 0;
        self.since = None;
    }

    /// Count one more error; true once the streak has lasted a full poll
    /// budget or reached [`MAX_CONSECUTIVE_ERRORS`].
    fn record(&mut self, poll_budget: Duration) -> bool {
        let since = *self.since.get_or_insert_with(Instant::now);
        self.count += 1;
        self.count >= MAX_CONSECUTIVE_ERRORS || since.elapsed() >= poll_budget
    }
}

/// Drains all currently available messages from a topic.
pub struct TopicDrainer<F: ConsumerFactory> {
    factory: F,
    sink: Arc<dyn DiagnosticsSink>,
    include_key: bool,
    cancel: CancellationToken,
}

impl<F: ConsumerFactory> TopicDrainer<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            sink: Arc::new(NullSink),
            include_key: true,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    /// When false, drained messages carry an empty key.
    pub fn with_include_key(mut self, include_key: bool) -> Self {
        self.include_key = include_key;
        self
    }

    /// Token that stops a running drain; the messages collected so far are
    /// returned with an error.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Drain `topic`, waiting at most `poll_budget` on each poll.
    ///
    /// Returns `Err` only when the drain cannot start (empty topic, invalid
    /// parameters, consumer creation failure). Everything that happens once
    /// polling has started ends up in the returned [`DrainResult`].
    pub fn drain(
        &self,
        params: &ConnectionParameters,
        topic: &str,
        poll_budget: Duration,
    ) -> Result<DrainResult> {
        if topic.trim().is_empty() {
            return Err(ConnectorError::InvalidConfig(
                "topic must not be empty".to_string(),
            ));
        }
        params.validate_consumer()?;

        let log = Diagnostics::new(Arc::clone(&self.sink), format!("drain topic={topic}"));
        log.info("started");

        let channel_log = log.clone();
        let on_error: ErrorListener = Arc::new(move |reason: &str| {
            channel_log.error(format!("connection error: {reason}"));
        });

        let consumer = self
            .factory
            .create(params, ClientRole::Drain, on_error)
            .inspect_err(|e| log.error(format!("could not create consumer: {e}")))?;
        let mut consumer = ClosingConsumer::new(consumer);

        if let Err(e) = consumer.subscribe(topic) {
            // No record will arrive; the first poll comes back empty.
            log.error(e.to_string());
        }

        let mut messages = Vec::new();
        let mut failing = ErrorStreak::new();
        let interrupted = loop {
            if self.cancel.is_cancelled() {
                break Some("cancellation requested".to_string());
            }

            match consumer.poll(poll_budget, &self.cancel) {
                Ok(Some(record)) => {
                    failing.reset();
                    if let Some(message) = self.accept(&mut *consumer, &record, &log) {
                        messages.push(message);
                    }
                }
                Ok(None) => {
                    log.info("no messages available");
                    break None;
                }
                Err(ConsumeError::Cancelled(reason)) => break Some(reason),
                Err(e) => {
                    log.error(e.to_string());
                    // Nothing but errors for a whole poll budget reads the
                    // same as an empty poll.
                    if failing.record(poll_budget) {
                        log.info(format!(
                            "no messages available after {} consecutive error(s)",
                            failing.count
                        ));
                        break None;
                    }
                }
            }
        };

        consumer.close();

        let result = match interrupted {
            None => DrainResult::completed(messages),
            Some(reason) => {
                log.error(format!("drain interrupted: {reason}"));
                DrainResult::interrupted(messages, reason)
            }
        };
        log.info(format!("finished with {} message(s)", result.len()));
        Ok(result)
    }

    /// Transform a record and store its offset. A message is only returned
    /// once its offset is stored.
    fn accept(
        &self,
        consumer: &mut F::Consumer,
        record: &Record,
        log: &Diagnostics,
    ) -> Option<InboundMessage> {
        log.debug(format!("processing message {}", record.offset));

        let message = match record.to_message(self.include_key) {
            Ok(message) => message,
            Err(e) => {
                log.error(format!("message {} skipped: {e}", record.offset));
                return None;
            }
        };

        if let Err(e) = consumer.store_offset(record) {
            log.error(format!("message {} skipped: {e}", record.offset));
            return None;
        }

        log.debug(format!("message {} processed", record.offset));
        Some(message)
    }
}
