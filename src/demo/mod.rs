//! One-shot producer and consumer roles, and the round driver that exercises
//! the topic broadcast path.
//!
//! Each role opens its own [`Session`], performs one operation and closes it;
//! there is no state shared between invocations. The driver coordinates the
//! pair with a readiness signal so a producer never publishes before its
//! consumer's subscription is registered.

use rand::Rng;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::session::Session;
use crate::track::Track;
use crate::utils::error::MessagingError;

/// Outcome of [`run_rounds`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoundsSummary {
    pub consumers_started: usize,
    pub producers_started: usize,
    pub tracks_delivered: usize,
}

/// Publishes a single track to `topic` with persistent delivery and closes
/// the connection.
///
/// The id is a random number in `[0, 100)` rendered as a string; the other
/// fields are fixed placeholders.
pub async fn produce_once(url: &str, topic: &str) -> Result<Track, MessagingError> {
    let id = rand::thread_rng().gen_range(0..100).to_string();
    let track = Track::new(&id, "Demo Track", "Demo Artist", "Demo Album");

    let mut session = Session::connect(url).await?;
    session.publish(topic, &track, true).await?;
    println!("Producer has sent the track: {}", track);
    session.close().await?;
    Ok(track)
}

/// Subscribes to `topic`, fires `ready` once the subscription is registered,
/// then waits for exactly one broadcast and prints it. Blocks indefinitely if
/// nothing is ever published.
pub async fn consume_once(
    url: &str,
    topic: &str,
    ready: oneshot::Sender<()>,
) -> Result<Option<Track>, MessagingError> {
    let mut session = Session::connect(url).await?;
    session.subscribe(topic).await?;
    // The driver holds the paired producer back until this fires.
    let _ = ready.send(());

    let track = session.next_track().await?;
    match &track {
        Some(track) => println!("Received track: {}", track),
        None => info!("dropped a broadcast payload that was not a track"),
    }
    session.close().await?;
    Ok(track)
}

/// Runs `rounds` consumer/producer pairs against `topic`.
///
/// Each round starts a consumer task, waits for its subscription to be
/// acknowledged, then starts the paired producer task. Every task handle is
/// joined before returning, so the caller observes completion
/// deterministically. Failures inside a task are logged and reflected in the
/// summary, never propagated.
pub async fn run_rounds(url: &str, topic: &str, rounds: usize) -> RoundsSummary {
    let mut summary = RoundsSummary::default();
    let mut consumers = Vec::with_capacity(rounds);
    let mut producers = Vec::with_capacity(rounds);

    for round in 0..rounds {
        let (ready_tx, ready_rx) = oneshot::channel();

        let consumer_url = url.to_string();
        let consumer_topic = topic.to_string();
        consumers.push(tokio::spawn(async move {
            consume_once(&consumer_url, &consumer_topic, ready_tx).await
        }));
        summary.consumers_started += 1;

        // Never publish before the subscription is registered.
        if ready_rx.await.is_err() {
            error!("consumer for round {} died before subscribing", round);
            continue;
        }

        let producer_url = url.to_string();
        let producer_topic = topic.to_string();
        producers.push(tokio::spawn(async move {
            produce_once(&producer_url, &producer_topic).await
        }));
        summary.producers_started += 1;
    }

    for handle in producers {
        match handle.await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => error!("producer failed: {}", e),
            Err(e) => error!("producer task panicked: {}", e),
        }
    }
    for handle in consumers {
        match handle.await {
            Ok(Ok(Some(_))) => summary.tracks_delivered += 1,
            Ok(Ok(None)) => {}
            Ok(Err(e)) => error!("consumer failed: {}", e),
            Err(e) => error!("consumer task panicked: {}", e),
        }
    }

    summary
}
