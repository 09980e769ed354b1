use std::sync::{Arc, Mutex};

use tracksub::broker::Broker;
use tracksub::config::load_config;
use tracksub::persistence::sled_store::Persistence;
use tracksub::transport::websocket::start_websocket_server;
use tracksub::utils::logging;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    logging::init(&level);

    let config = load_config().expect("failed to load configuration");
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let store = Persistence::new(
        &config.broker.data_dir,
        Some(config.broker.message_ttl_secs as i64),
        Some(config.broker.max_messages_per_destination),
    );
    let broker = Arc::new(Mutex::new(Broker::new_with_persistence(store)));

    start_websocket_server(addr, broker, config).await;
}
