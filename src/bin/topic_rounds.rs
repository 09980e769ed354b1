//! Reads a round count from standard input and runs that many
//! consumer/producer pairs against the configured topic.
//!
//! Each round a consumer subscribes first, then its paired producer
//! publishes; every spawned task is awaited before the process exits.

use std::io::{self, BufRead};

use tracksub::config::load_config;
use tracksub::demo::run_rounds;
use tracksub::utils::error::MessagingError;
use tracksub::utils::logging;

#[tokio::main]
async fn main() -> Result<(), MessagingError> {
    dotenvy::dotenv().ok();
    logging::init("info");

    let config = load_config().expect("failed to load configuration");

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let rounds: usize = line.trim().parse().map_err(|_| {
        MessagingError::InvalidInput(format!("expected a round count, got '{}'", line.trim()))
    })?;

    let summary = run_rounds(&config.messaging.url, &config.messaging.topic, rounds).await;
    println!(
        "Finished {} rounds: {} consumers, {} producers, {} tracks delivered",
        rounds, summary.consumers_started, summary.producers_started, summary.tracks_delivered
    );
    Ok(())
}
