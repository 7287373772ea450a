//! Duration parsing utilities.

use anyhow::Context;

/// Parse a duration string like "500ms", "10s", "1m", "1h" or "10000" into
/// milliseconds.
/// Supports:
/// - Plain numbers (interpreted as milliseconds): "10000"
/// - Milliseconds suffix: "500ms"
/// - Seconds suffix: "10s"
/// - Minutes suffix: "1m"
/// - Hours suffix: "1h"
pub fn parse_duration_to_millis(s: &str) -> anyhow::Result<u64> {
    let s = s.trim();
    if s.is_empty() {
        anyhow::bail!("Empty duration string");
    }

    // "ms" must be checked before "m" and "s"
    if let Some(num_str) = s.strip_suffix("ms") {
        return num_str
            .parse()
            .with_context(|| format!("Invalid milliseconds value: {num_str}"));
    }
    if let Some(num_str) = s.strip_suffix('h') {
        let hours: u64 = num_str
            .parse()
            .with_context(|| format!("Invalid hours value: {num_str}"))?;
        return hours
            .checked_mul(3_600_000)
            .with_context(|| format!("Duration too large: {s}"));
    }
    if let Some(num_str) = s.strip_suffix('m') {
        let minutes: u64 = num_str
            .parse()
            .with_context(|| format!("Invalid minutes value: {num_str}"))?;
        return minutes
            .checked_mul(60_000)
            .with_context(|| format!("Duration too large: {s}"));
    }
    if let Some(num_str) = s.strip_suffix('s') {
        let secs: u64 = num_str
            .parse()
            .with_context(|| format!("Invalid seconds value: {num_str}"))?;
        return secs
            .checked_mul(1000)
            .with_context(|| format!("Duration too large: {s}"));
    }

    // No suffix - treat as milliseconds
    s.parse::<u64>()
        .with_context(|| format!("Invalid duration value: {s}"))
}

/// `clap` value parser wrapper around [`parse_duration_to_millis`].
pub fn duration_millis_arg(s: &str) -> Result<u64, String> {
    parse_duration_to_millis(s).map_err(|e| format!("{e:#}"))
}
