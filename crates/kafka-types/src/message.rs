//! Drained messages and the drain result.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A message drained from a topic.
///
/// Built by the drain loop once its offset has been stored; never modified
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboundMessage {
    /// Broker offset, stringified
    pub id: String,
    /// Message creation time (Unix epoch when the broker reports none)
    pub created: DateTime<Utc>,
    /// Message key, empty when absent or not requested
    pub key: String,
    /// Message payload as text
    pub value: String,
}

impl InboundMessage {
    pub fn new(
        id: impl Into<String>,
        created: DateTime<Utc>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            created,
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Messages drained from a topic, in consumption order.
///
/// `error` is only set when the loop was cut short by a cancellation; the
/// messages accumulated until then are still returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainResult {
    messages: Vec<InboundMessage>,
    error: Option<String>,
}

impl DrainResult {
    pub fn completed(messages: Vec<InboundMessage>) -> Self {
        Self {
            messages,
            error: None,
        }
    }

    pub fn interrupted(messages: Vec<InboundMessage>, error: impl Into<String>) -> Self {
        Self {
            messages,
            error: Some(error.into()),
        }
    }

    pub fn messages(&self) -> &[InboundMessage] {
        &self.messages
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_messages(self) -> Vec<InboundMessage> {
        self.messages
    }

    pub fn into_envelope(self) -> ResponseEnvelope {
        ResponseEnvelope {
            success: self.error.is_none(),
            error: self.error,
            messages: self.messages,
        }
    }
}

/// Wrapped form of a [`DrainResult`] for callers that want status and
/// messages in one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub error: Option<String>,
    pub messages: Vec<InboundMessage>,
}
