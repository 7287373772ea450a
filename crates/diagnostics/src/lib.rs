//! Diagnostics trail for kafka-connector operations.
//!
//! Every connector operation writes a human-readable trail of what it did
//! (start, each message handled, errors, end) to a per-day log file. Writing
//! that trail must never be able to fail the operation itself, so
//! [`DiagnosticsSink::log`] has no error path: implementations report their own
//! failures to stderr and carry on.
//!
//! - [`DailyFileSink`] - appends to `<dir>/<host>.kafka-connector.<date>.log`
//! - [`MemorySink`] - keeps lines in memory, for tests
//! - [`NullSink`] - discards everything
//! - [`Diagnostics`] - prefixes lines with the operation name and mirrors them
//!   as `tracing` events

mod diagnostics;
mod file;
mod sink;

pub use diagnostics::Diagnostics;
pub use file::{format_line, DailyFileSink, LOG_FILE_TAG};
pub use sink::{DiagnosticsSink, MemorySink, NullSink};
