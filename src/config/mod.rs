mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{BrokerSettings, MessagingSettings, ServerSettings, Settings};

/// Loads configuration from `config/default` (if present) and environment
/// variables, merging whatever is specified over the built-in defaults.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("_").try_parsing(true));

    let config = builder.build()?;

    // Deserialize only what the sources actually provide.
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults.
    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
        },
        broker: BrokerSettings {
            max_connections: partial
                .broker
                .as_ref()
                .and_then(|b| b.max_connections)
                .unwrap_or(default.broker.max_connections),
            message_ttl_secs: partial
                .broker
                .as_ref()
                .and_then(|b| b.message_ttl_secs)
                .unwrap_or(default.broker.message_ttl_secs),
            max_messages_per_destination: partial
                .broker
                .as_ref()
                .and_then(|b| b.max_messages_per_destination)
                .unwrap_or(default.broker.max_messages_per_destination),
            data_dir: partial
                .broker
                .as_ref()
                .and_then(|b| b.data_dir.clone())
                .unwrap_or(default.broker.data_dir),
        },
        messaging: MessagingSettings {
            url: partial
                .messaging
                .as_ref()
                .and_then(|m| m.url.clone())
                .unwrap_or(default.messaging.url),
            queue: partial
                .messaging
                .as_ref()
                .and_then(|m| m.queue.clone())
                .unwrap_or(default.messaging.queue),
            topic: partial
                .messaging
                .as_ref()
                .and_then(|m| m.topic.clone())
                .unwrap_or(default.messaging.topic),
        },
    })
}

#[cfg(test)]
mod tests;
