//! Native transport readiness.
//!
//! The broker transport is librdkafka. Which native library backs it depends on
//! the platform; that choice is resolved once per process, on first use, and
//! never torn down. Callers only learn whether the transport is ready.

use kafka_types::{ConnectorError, Result};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl Platform {
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" => Platform::Linux,
            "macos" => Platform::MacOs,
            "windows" => Platform::Windows,
            _ => Platform::Other,
        }
    }

    /// File name of the native library on this platform.
    pub fn native_library(self) -> &'static str {
        match self {
            Platform::Linux | Platform::Other => "librdkafka.so.1",
            Platform::MacOs => "librdkafka.1.dylib",
            Platform::Windows => "librdkafka.dll",
        }
    }
}

/// What was resolved about the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportInfo {
    pub platform: Platform,
    pub library: &'static str,
    /// librdkafka version string, e.g. `2.3.0`
    pub version: String,
    pub version_hex: i32,
}

static TRANSPORT: OnceLock<TransportInfo> = OnceLock::new();

fn resolve() -> TransportInfo {
    let platform = Platform::detect();
    let (version_hex, version) = rdkafka::util::get_rdkafka_version();
    tracing::debug!(
        "Resolved Kafka transport: {} {version} on {platform:?}",
        platform.native_library()
    );
    TransportInfo {
        platform,
        library: platform.native_library(),
        version,
        version_hex,
    }
}

/// Resolve the transport on first call and report whether it is usable.
pub fn ensure_ready() -> Result<&'static TransportInfo> {
    let info = TRANSPORT.get_or_init(resolve);
    if info.version_hex <= 0 || info.version.is_empty() {
        return Err(ConnectorError::Transport(format!(
            "{} did not report a version",
            info.library
        )));
    }
    Ok(info)
}
