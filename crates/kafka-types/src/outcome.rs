//! Publish outcome.

use std::fmt;

/// Result of a single publish: empty on success, otherwise the failure reason.
///
/// There is no partial-success state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishOutcome(String);

impl PublishOutcome {
    pub fn success() -> Self {
        Self(String::new())
    }

    /// A failed publish. An empty reason is replaced so that a failure can
    /// never be mistaken for a success.
    pub fn failure(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if reason.is_empty() {
            Self("unknown publish failure".to_string())
        } else {
            Self(reason)
        }
    }

    pub fn is_success(&self) -> bool {
        self.0.is_empty()
    }

    pub fn reason(&self) -> Option<&str> {
        if self.0.is_empty() {
            None
        } else {
            Some(&self.0)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PublishOutcome> for String {
    fn from(outcome: PublishOutcome) -> Self {
        outcome.0
    }
}
