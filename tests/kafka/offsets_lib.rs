//! Publish, store offsets and drain against a live broker.

use kafka_connector::{ConnectionParameters, Connector, ConnectorOptions};
use kafka_connector_client::ClientRole;
use kafka_connector_diagnostics::NullSink;
use kafka_connector_source::{BrokerConsumer, ConsumerFactory, RdkafkaConsumerFactory, Record};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Kafka broker address for testing
fn brokers() -> Vec<String> {
    std::env::var("KAFKA_TEST_BROKERS")
        .unwrap_or_else(|_| "kafka:9092".to_string())
        .split(',')
        .map(str::to_string)
        .collect()
}

fn unique(prefix: &str) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{prefix}-{}-{nanos}", std::process::id())
}

fn params(group: &str) -> ConnectionParameters {
    ConnectionParameters::new(brokers(), group).with_message_timeout_ms(10_000)
}

fn connector(group: &str) -> Connector {
    Connector::new(params(group), ConnectorOptions::default()).with_sink(Arc::new(NullSink))
}

/// Poll until a record arrives or `within` runs out.
fn first_record(consumer: &mut impl BrokerConsumer, within: Duration) -> Option<Record> {
    let cancel = CancellationToken::new();
    let deadline = Instant::now() + within;
    while Instant::now() < deadline {
        if let Ok(Some(record)) = consumer.poll(Duration::from_secs(1), &cancel) {
            return Some(record);
        }
    }
    None
}

#[test]
#[ignore = "requires a Kafka broker"]
fn test_stored_offset_is_where_the_group_resumes() {
    let topic = unique("kc-offsets");
    let group = unique("kc-group");
    let publisher = connector(&group);
    for (key, value) in [("k0", "zero"), ("k1", "one"), ("k2", "two")] {
        let outcome = publisher.publish(&topic, value, key);
        assert!(outcome.is_success(), "publish failed: {outcome}");
    }

    // Read offset 0 from the beginning and store it.
    let factory = RdkafkaConsumerFactory::new();
    let mut consumer = factory
        .create(&params(&group), ClientRole::Probe, Arc::new(|_: &str| {}))
        .unwrap();
    consumer.subscribe(&topic).unwrap();
    let record = first_record(&mut consumer, Duration::from_secs(30)).expect("no record");
    assert_eq!(record.offset, 0);
    consumer.store_offset(&record).unwrap();
    consumer.close();

    // The group resumes right after the stored record.
    let drained = connector(&group).read_messages(&topic).unwrap();
    assert!(drained.is_complete());
    let ids: Vec<&str> = drained.messages().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(drained.messages()[0].key, "k1");
    assert_eq!(drained.messages()[1].value, "two");

    // Everything drained was stored, so nothing is left.
    let again = connector(&group).read_messages(&topic).unwrap();
    assert!(again.is_empty());
}

#[test]
#[ignore = "requires a Kafka broker"]
fn test_publish_and_check_against_live_broker() {
    let topic = unique("kc-check");
    let connector = connector(&unique("kc-group"));

    let outcome = connector.publish(&topic, r#"{"id":1}"#, "");
    assert_eq!(outcome.as_str(), "");
    assert!(connector.check_connection(&topic));
}
