//! Client context carrying the asynchronous error channel.

use rdkafka::client::ClientContext;
use rdkafka::consumer::ConsumerContext;
use rdkafka::error::KafkaError;
use std::fmt;
use std::sync::Arc;

/// Receives transport-level errors reported by the client library.
///
/// Called from within `poll` on the polling thread, or from librdkafka's
/// background threads for producers.
pub type ErrorListener = Arc<dyn Fn(&str) + Send + Sync>;

/// rdkafka context that forwards every client error to an [`ErrorListener`].
#[derive(Clone)]
pub struct ListeningContext {
    on_error: ErrorListener,
}

impl ListeningContext {
    pub fn new(on_error: ErrorListener) -> Self {
        Self { on_error }
    }

    /// Forward an error to the listener.
    pub fn report(&self, reason: &str) {
        (self.on_error)(reason);
    }
}

impl fmt::Debug for ListeningContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListeningContext").finish_non_exhaustive()
    }
}

impl ClientContext for ListeningContext {
    fn error(&self, error: KafkaError, reason: &str) {
        tracing::debug!("Kafka client error: {error}: {reason}");
        self.report(&format!("{error}: {reason}"));
    }
}

impl ConsumerContext for ListeningContext {}
