//! Connector variant options.

use serde::Deserialize;
use std::path::PathBuf;

/// Options that select between the connector variants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectorOptions {
    /// Copy the message key into drained messages; when false the key is
    /// always the empty string.
    pub include_key: bool,
    /// Directory for the daily diagnostics log (system temp dir when unset)
    pub log_path: Option<PathBuf>,
    /// Render drain results inside a [`crate::ResponseEnvelope`]
    pub wrap_in_envelope: bool,
}

impl Default for ConnectorOptions {
    fn default() -> Self {
        Self {
            include_key: true,
            log_path: None,
            wrap_in_envelope: false,
        }
    }
}
