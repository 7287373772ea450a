//! Kafka broker tests
//!
//! These talk to a real broker and are ignored by default. The broker address
//! comes from `KAFKA_TEST_BROKERS` (default `kafka:9092`) and the broker must
//! auto-create topics.
//!
//! ```bash
//! KAFKA_TEST_BROKERS=localhost:9092 cargo test --test kafka -- --ignored
//! ```

mod offsets_lib;
