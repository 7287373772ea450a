use std::sync::Arc;

use crate::sink::DiagnosticsSink;

/// Operation-scoped logger.
///
/// Each line is prefixed with the operation name (e.g. `drain topic=orders`),
/// written to the sink and mirrored as a `tracing` event at the matching
/// level.
#[derive(Clone)]
pub struct Diagnostics {
    sink: Arc<dyn DiagnosticsSink>,
    prefix: String,
}

impl Diagnostics {
    pub fn new(sink: Arc<dyn DiagnosticsSink>, prefix: impl Into<String>) -> Self {
        Self {
            sink,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn line(&self, message: &str) -> String {
        format!("{}: {}", self.prefix, message)
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        let line = self.line(message.as_ref());
        tracing::debug!("{line}");
        self.sink.log(&line);
    }

    pub fn info(&self, message: impl AsRef<str>) {
        let line = self.line(message.as_ref());
        tracing::info!("{line}");
        self.sink.log(&line);
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        let line = self.line(message.as_ref());
        tracing::warn!("{line}");
        self.sink.log(&line);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        let line = self.line(message.as_ref());
        tracing::error!("{line}");
        self.sink.log(&line);
    }
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
