//! rdkafka client configuration.

use kafka_types::ConnectionParameters;
use rdkafka::config::ClientConfig;

/// What a client is created for.
///
/// The roles differ in offset handling: the drain consumer starts from the
/// latest offset and only advances over offsets it stores itself, the probe
/// starts from the earliest offset and never stores anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientRole {
    Drain,
    Probe,
    Producer,
}

impl ClientRole {
    fn auto_offset_reset(self) -> Option<&'static str> {
        match self {
            ClientRole::Drain => Some("latest"),
            ClientRole::Probe => Some("earliest"),
            ClientRole::Producer => None,
        }
    }
}

/// Build the rdkafka configuration for `role`.
///
/// Credentials in `params` are not applied: the connection is always
/// plaintext.
pub fn client_config(params: &ConnectionParameters, role: ClientRole) -> ClientConfig {
    let mut config = ClientConfig::new();
    config
        .set("bootstrap.servers", params.bootstrap_servers())
        .set("security.protocol", "plaintext")
        .set("message.max.bytes", params.message_max_bytes.to_string())
        .set(
            "receive.message.max.bytes",
            params.receive_message_max_bytes.to_string(),
        );

    match role {
        ClientRole::Drain | ClientRole::Probe => {
            config
                .set("group.id", &params.group_id)
                .set("fetch.max.bytes", params.fetch_max_bytes.to_string())
                .set("max.poll.interval.ms", params.max_poll_interval_ms.to_string())
                .set("session.timeout.ms", params.session_timeout_ms.to_string())
                // Offsets are stored explicitly, one message at a time, and
                // stored offsets are committed in the background.
                .set("enable.auto.commit", "true")
                .set("enable.auto.offset.store", "false")
                .set("enable.partition.eof", "false");
        }
        ClientRole::Producer => {
            config.set("message.timeout.ms", params.message_timeout_ms.to_string());
        }
    }

    if let Some(reset) = role.auto_offset_reset() {
        config.set("auto.offset.reset", reset);
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ConnectionParameters {
        ConnectionParameters::new(
            vec!["kafka-1:9092".to_string(), "kafka-2:9092".to_string()],
            "orders-reader",
        )
        .with_credentials("user", "secret")
    }

    #[test]
    fn test_drain_config() {
        let config = client_config(&params(), ClientRole::Drain);
        assert_eq!(config.get("bootstrap.servers"), Some("kafka-1:9092,kafka-2:9092"));
        assert_eq!(config.get("group.id"), Some("orders-reader"));
        assert_eq!(config.get("auto.offset.reset"), Some("latest"));
        assert_eq!(config.get("enable.auto.commit"), Some("true"));
        assert_eq!(config.get("enable.auto.offset.store"), Some("false"));
        assert_eq!(config.get("max.poll.interval.ms"), Some("10000"));
        assert_eq!(config.get("session.timeout.ms"), Some("10000"));
        assert_eq!(config.get("fetch.max.bytes"), Some("1800000000"));
        assert_eq!(config.get("receive.message.max.bytes"), Some("1850000000"));
    }

    #[test]
    fn test_probe_starts_from_earliest() {
        let config = client_config(&params(), ClientRole::Probe);
        assert_eq!(config.get("auto.offset.reset"), Some("earliest"));
        assert_eq!(config.get("enable.auto.offset.store"), Some("false"));
    }

    #[test]
    fn test_producer_config_has_no_group() {
        let config = client_config(&params(), ClientRole::Producer);
        assert_eq!(config.get("group.id"), None);
        assert_eq!(config.get("auto.offset.reset"), None);
        assert_eq!(config.get("message.timeout.ms"), Some("5000"));
    }

    #[test]
    fn test_credentials_are_not_applied() {
        let config = client_config(&params(), ClientRole::Drain);
        assert_eq!(config.get("security.protocol"), Some("plaintext"));
        assert_eq!(config.get("sasl.username"), None);
        assert_eq!(config.get("sasl.password"), None);
    }
}
