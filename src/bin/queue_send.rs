//! Posts a single track to the configured queue and exits.
//!
//! Field values come from positional arguments (id, name, artist, album);
//! missing ones fall back to placeholders. Any failure aborts the run.

use std::env;

use tracksub::config::load_config;
use tracksub::session::Session;
use tracksub::track::Track;
use tracksub::utils::error::MessagingError;
use tracksub::utils::logging;

#[tokio::main]
async fn main() -> Result<(), MessagingError> {
    dotenvy::dotenv().ok();
    logging::init("info");

    let config = load_config().expect("failed to load configuration");
    println!("URL: {}", config.messaging.url);

    let mut args = env::args().skip(1);
    let id = args.next().unwrap_or_else(|| "1".to_string());
    let name = args.next().unwrap_or_else(|| "Demo Track".to_string());
    let artist = args.next().unwrap_or_else(|| "Demo Artist".to_string());
    let album = args.next().unwrap_or_else(|| "Demo Album".to_string());
    let track = Track::new(&id, &name, &artist, &album);

    let mut session = Session::connect(&config.messaging.url).await?;
    session.send(&config.messaging.queue, &track, true).await?;
    println!(
        "Track {} sent successfully to queue {}",
        track, config.messaging.queue
    );
    session.close().await?;
    Ok(())
}
