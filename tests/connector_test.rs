//! Connector facade against the scripted broker and producers.

use kafka_connector::{ConnectionParameters, Connector, ConnectorError, ConnectorOptions};
use kafka_connector_diagnostics::{DailyFileSink, MemorySink};
use kafka_connector_producer::testing::ScriptedProducers;
use kafka_connector_source::testing::{ScriptedBroker, Step};
use std::sync::Arc;

fn params() -> ConnectionParameters {
    ConnectionParameters::new(vec!["localhost:9092".to_string()], "orders-reader")
}

fn orders() -> ScriptedBroker {
    ScriptedBroker::new().with_messages(
        "orders",
        &[
            (10, "order-10", r#"{"id":10}"#),
            (11, "order-11", r#"{"id":11}"#),
            (12, "order-12", r#"{"id":12}"#),
        ],
    )
}

fn connector(
    broker: ScriptedBroker,
    producers: ScriptedProducers,
    options: ConnectorOptions,
) -> (Connector<ScriptedBroker, ScriptedProducers>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let connector = Connector::with_factories(params(), options, broker, producers)
        .with_sink(sink.clone());
    (connector, sink)
}

// ============================================================================
// Drain
// ============================================================================

#[test]
fn test_read_messages_drains_topic() {
    let broker = orders();
    let (connector, sink) = connector(
        broker.clone(),
        ScriptedProducers::new(),
        ConnectorOptions::default(),
    );

    let result = connector.read_messages("orders").unwrap();

    let ids: Vec<&str> = result.messages().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["10", "11", "12"]);
    assert_eq!(result.messages()[1].key, "order-11");
    assert_eq!(broker.stored_offsets(), vec![10, 11, 12]);
    assert_eq!(broker.poll_budgets()[0], params().poll_budget());
    assert!(sink.contains("drain topic=orders: started"));
}

#[test]
fn test_read_messages_without_keys() {
    let options = ConnectorOptions {
        include_key: false,
        ..Default::default()
    };
    let (connector, _) = connector(orders(), ScriptedProducers::new(), options);

    let result = connector.read_messages("orders").unwrap();

    assert_eq!(result.len(), 3);
    assert!(result.messages().iter().all(|m| m.key.is_empty()));
}

#[test]
fn test_read_messages_rejects_missing_group() {
    let sink = Arc::new(MemorySink::new());
    let connector = Connector::with_factories(
        ConnectionParameters::new(vec!["localhost:9092".to_string()], ""),
        ConnectorOptions::default(),
        orders(),
        ScriptedProducers::new(),
    )
    .with_sink(sink);

    assert!(matches!(
        connector.read_messages("orders"),
        Err(ConnectorError::InvalidConfig(_))
    ));
}

#[test]
fn test_cancelled_connector_stops_before_polling() {
    let broker = orders();
    let (connector, _) = connector(
        broker.clone(),
        ScriptedProducers::new(),
        ConnectorOptions::default(),
    );
    connector.cancellation().cancel();

    let result = connector.read_messages("orders").unwrap();

    assert!(result.is_empty());
    assert_eq!(result.error(), Some("cancellation requested"));
    assert!(broker.poll_budgets().is_empty());
    assert_eq!(broker.closed_count(), 1);
}

#[test]
fn test_interrupted_drain_keeps_collected_messages() {
    let broker = ScriptedBroker::new().with_messages("orders", &[(10, "", "a"), (11, "", "b")]);
    broker.push(Step::Cancel);
    let broker = broker.with_messages("orders", &[(12, "", "c")]);
    let (connector, _) = connector(
        broker.clone(),
        ScriptedProducers::new(),
        ConnectorOptions::default(),
    );

    let result = connector.read_messages("orders").unwrap();

    assert_eq!(result.len(), 2);
    assert!(!result.is_complete());
    assert_eq!(broker.stored_offsets(), vec![10, 11]);
    assert!(connector.cancellation().is_cancelled());
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_render_plain_message_list() {
    let (connector, _) = connector(orders(), ScriptedProducers::new(), ConnectorOptions::default());
    let result = connector.read_messages("orders").unwrap();

    let rendered = connector.render(&result).unwrap();

    let list = rendered.as_array().unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[0]["id"], "10");
    assert_eq!(list[0]["key"], "order-10");
    assert_eq!(list[0]["value"], r#"{"id":10}"#);
    assert!(list[0]["created"].as_str().unwrap().starts_with("2023-11-14T22:13:20"));
}

#[test]
fn test_render_envelope() {
    let options = ConnectorOptions {
        wrap_in_envelope: true,
        ..Default::default()
    };
    let (connector, _) = connector(orders(), ScriptedProducers::new(), options);
    let result = connector.read_messages("orders").unwrap();

    let rendered = connector.render(&result).unwrap();

    assert_eq!(rendered["success"], true);
    assert!(rendered["error"].is_null());
    assert_eq!(rendered["messages"].as_array().unwrap().len(), 3);
}

// ============================================================================
// Probe and publish
// ============================================================================

#[test]
fn test_check_connection_reports_channel_errors() {
    let (healthy, _) = connector(
        ScriptedBroker::new(),
        ScriptedProducers::new(),
        ConnectorOptions::default(),
    );
    assert!(healthy.check_connection("orders"));

    let broker = ScriptedBroker::new();
    broker.push(Step::TransportError(
        "localhost:9092/bootstrap: Connect to ipv4#127.0.0.1:9092 failed".to_string(),
    ));
    let (unhealthy, sink) = connector(broker, ScriptedProducers::new(), ConnectorOptions::default());
    assert!(!unhealthy.check_connection("orders"));
    assert!(sink.contains("check topic=orders: unhealthy"));
}

#[test]
fn test_publish_outcome() {
    let producers = ScriptedProducers::new();
    let (connector, _) = connector(
        ScriptedBroker::new(),
        producers.clone(),
        ConnectorOptions::default(),
    );

    assert!(connector.publish("orders", r#"{"id":42}"#, "order-42").is_success());
    assert_eq!(producers.sent()[0].key.as_deref(), Some("order-42"));

    producers.fail_with("Broker: Unknown topic or partition");
    let outcome = connector.publish("orders", "v", "");
    assert_eq!(outcome.reason(), Some("Broker: Unknown topic or partition"));
}

// ============================================================================
// Diagnostics file
// ============================================================================

#[test]
fn test_operations_write_daily_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let sink = DailyFileSink::new(Some(dir.path().to_path_buf())).with_host("test-host");
    let connector = Connector::with_factories(
        params(),
        ConnectorOptions::default(),
        orders(),
        ScriptedProducers::new(),
    )
    .with_sink(Arc::new(sink.clone()));

    connector.read_messages("orders").unwrap();

    let path = sink.file_path(chrono::Local::now().date_naive());
    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.contains("drain topic=orders: started"));
    assert!(content.contains("finished with 3 message(s)"));
}
