//! Raw broker records and their conversion to [`InboundMessage`].

use chrono::{DateTime, Utc};
use kafka_types::InboundMessage;

use crate::error::TransformError;

/// A record as handed over by the broker client, before any decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    /// Creation time in milliseconds since epoch (if available)
    pub timestamp: Option<i64>,
    pub key: Option<Vec<u8>>,
    pub payload: Option<Vec<u8>>,
}

impl Record {
    pub fn new(topic: impl Into<String>, partition: i32, offset: i64) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset,
            timestamp: None,
            key: None,
            payload: None,
        }
    }

    pub fn with_timestamp(mut self, millis: i64) -> Self {
        self.timestamp = Some(millis);
        self
    }

    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Decode into an [`InboundMessage`].
    ///
    /// The payload and, when `include_key` is set, the key must be UTF-8. A
    /// missing payload becomes an empty value and a missing key the empty
    /// string.
    pub fn to_message(&self, include_key: bool) -> Result<InboundMessage, TransformError> {
        let value = match &self.payload {
            Some(bytes) => self.text("payload", bytes)?,
            None => String::new(),
        };

        let key = match (&self.key, include_key) {
            (Some(bytes), true) => self.text("key", bytes)?,
            _ => String::new(),
        };

        let created = self
            .timestamp
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        Ok(InboundMessage {
            id: self.offset.to_string(),
            created,
            key,
            value,
        })
    }

    fn text(&self, field: &'static str, bytes: &[u8]) -> Result<String, TransformError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| TransformError::InvalidUtf8 {
            field,
            offset: self.offset,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_message() {
        let record = Record::new("orders", 0, 10)
            .with_timestamp(1_700_000_000_123)
            .with_key("order-10")
            .with_payload(r#"{"total":12}"#);

        let message = record.to_message(true).unwrap();
        assert_eq!(message.id, "10");
        assert_eq!(message.key, "order-10");
        assert_eq!(message.value, r#"{"total":12}"#);
        assert_eq!(message.created.timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn test_key_left_empty_when_not_requested() {
        let record = Record::new("orders", 0, 3)
            .with_key(vec![0xff, 0xfe])
            .with_payload("v");

        let message = record.to_message(false).unwrap();
        assert_eq!(message.key, "");
    }

    #[test]
    fn test_missing_parts_use_sentinels() {
        let message = Record::new("orders", 1, 7).to_message(true).unwrap();
        assert_eq!(message.key, "");
        assert_eq!(message.value, "");
        assert_eq!(message.created, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_invalid_payload_is_rejected() {
        let record = Record::new("orders", 0, 11).with_payload(vec![0xc3, 0x28]);

        let err = record.to_message(true).unwrap_err();
        assert!(matches!(
            err,
            TransformError::InvalidUtf8 {
                field: "payload",
                offset: 11,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_key_is_rejected_when_requested() {
        let record = Record::new("orders", 0, 12)
            .with_key(vec![0xc3, 0x28])
            .with_payload("ok");

        assert!(record.to_message(true).is_err());
        assert!(record.to_message(false).is_ok());
    }
}
