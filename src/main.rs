//! Command-line interface for kafka-connector
//!
//! # Usage Examples
//!
//! ```bash
//! # Drain everything currently on a topic, without keys, wrapped in an envelope
//! kafka-connector drain orders --brokers localhost:9092 --no-key --envelope
//!
//! # Exit status tells whether the broker is reachable
//! kafka-connector check orders --brokers localhost:9092
//!
//! # Publish one message
//! kafka-connector publish orders '{"id":42}' --key order-42
//!
//! # Settings from a file
//! kafka-connector drain orders --config connector.toml
//! ```
//!
//! Diagnostics go to `<log-path>/<host>.kafka-connector.<date>.log`; set
//! `RUST_LOG` to also see them on stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use kafka_connector::{ConnectionOpts, Connector};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "kafka-connector")]
#[command(about = "Drain a Kafka topic, probe a broker, or publish a message")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every message currently available on a topic as JSON
    Drain {
        /// Topic to drain
        topic: String,

        /// Leave message keys empty
        #[arg(long)]
        no_key: bool,

        /// Wrap the messages in a {success, error, messages} document
        #[arg(long)]
        envelope: bool,

        #[command(flatten)]
        conn: ConnectionOpts,
    },

    /// Check that the broker can be reached and the topic subscribed to
    Check {
        /// Topic to subscribe to
        topic: String,

        #[command(flatten)]
        conn: ConnectionOpts,
    },

    /// Publish one message
    Publish {
        /// Destination topic
        topic: String,

        /// Message payload
        value: String,

        /// Message key (no key when omitted)
        #[arg(long, default_value = "")]
        key: String,

        #[command(flatten)]
        conn: ConnectionOpts,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Drain {
            topic,
            no_key,
            envelope,
            conn,
        } => {
            let (params, mut options) = conn.resolve()?;
            if no_key {
                options.include_key = false;
            }
            if envelope {
                options.wrap_in_envelope = true;
            }
            run_drain(Connector::new(params, options), topic).await
        }
        Commands::Check { topic, conn } => {
            let (params, options) = conn.resolve()?;
            let connector = Arc::new(Connector::new(params, options));
            let healthy = tokio::task::spawn_blocking(move || connector.check_connection(&topic))
                .await
                .context("Connection check task failed")?;
            println!("{healthy}");
            if !healthy {
                std::process::exit(2);
            }
            Ok(())
        }
        Commands::Publish {
            topic,
            value,
            key,
            conn,
        } => {
            let (params, options) = conn.resolve()?;
            let connector = Arc::new(Connector::new(params, options));
            let outcome =
                tokio::task::spawn_blocking(move || connector.publish(&topic, &value, &key))
                    .await
                    .context("Publish task failed")?;
            match outcome.reason() {
                None => Ok(()),
                Some(reason) => anyhow::bail!("Publish failed: {reason}"),
            }
        }
    }
}

/// Drain on a blocking thread while Ctrl-C interrupts the loop. An
/// interrupted drain still prints the messages it collected.
async fn run_drain(connector: Connector, topic: String) -> anyhow::Result<()> {
    let connector = Arc::new(connector);
    let cancel = connector.cancellation();

    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping drain");
            cancel.cancel();
        }
    });

    let worker = Arc::clone(&connector);
    let result = tokio::task::spawn_blocking(move || worker.read_messages(&topic))
        .await
        .context("Drain task failed")?;
    interrupt.abort();

    let result = result.context("Drain could not start")?;
    if let Some(error) = result.error() {
        tracing::warn!("Drain interrupted after {} message(s): {error}", result.len());
    }

    let rendered = connector
        .render(&result)
        .context("Failed to render drained messages")?;
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}
