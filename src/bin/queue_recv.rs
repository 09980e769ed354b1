//! Pulls exactly one track from the configured queue and exits.
//!
//! Blocks until a message is available; there is no timeout. A payload that
//! does not decode as a track is consumed but not printed. Any failure
//! aborts the run.

use tracksub::config::load_config;
use tracksub::session::Session;
use tracksub::utils::error::MessagingError;
use tracksub::utils::logging;

#[tokio::main]
async fn main() -> Result<(), MessagingError> {
    dotenvy::dotenv().ok();
    logging::init("info");

    let config = load_config().expect("failed to load configuration");
    println!("URL: {}", config.messaging.url);

    let mut session = Session::connect(&config.messaging.url).await?;
    if let Some(track) = session.receive(&config.messaging.queue).await? {
        println!("Received track: {}", track);
    }
    session.close().await?;
    Ok(())
}
