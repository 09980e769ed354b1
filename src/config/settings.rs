use serde::Deserialize;

/// Top-level configuration: the server bind address, broker limits and the
/// messaging destinations demo clients use.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub broker: BrokerSettings,
    pub messaging: MessagingSettings,
}

/// Host and port the broker binds to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Operational limits and the location of the persistent message store.
#[derive(Debug, Deserialize, Clone)]
pub struct BrokerSettings {
    pub max_connections: usize,
    pub message_ttl_secs: u64,
    pub max_messages_per_destination: usize,
    pub data_dir: String,
}

/// The broker locator and destination names, passed into sessions explicitly
/// instead of living in process-wide statics.
#[derive(Debug, Deserialize, Clone)]
pub struct MessagingSettings {
    pub url: String,
    pub queue: String,
    pub topic: String,
}

/// Partial mirror of [`Settings`] for sources that specify only some values.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub broker: Option<PartialBrokerSettings>,
    pub messaging: Option<PartialMessagingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub max_connections: Option<usize>,
    pub message_ttl_secs: Option<u64>,
    pub max_messages_per_destination: Option<usize>,
    pub data_dir: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialMessagingSettings {
    pub url: Option<String>,
    pub queue: Option<String>,
    pub topic: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            broker: BrokerSettings {
                max_connections: 1000,
                message_ttl_secs: 3600,
                max_messages_per_destination: 1000,
                data_dir: "tracksub_db".to_string(),
            },
            messaging: MessagingSettings {
                url: "ws://127.0.0.1:8080".to_string(),
                queue: "track_queue".to_string(),
                topic: "track_topic".to_string(),
            },
        }
    }
}
