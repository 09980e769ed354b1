use serial_test::serial;

use super::{Settings, load_config};

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.broker.max_connections, 1000);
    assert_eq!(settings.broker.message_ttl_secs, 3600);
    assert_eq!(settings.broker.max_messages_per_destination, 1000);
    assert_eq!(settings.messaging.url, "ws://127.0.0.1:8080");
    assert_eq!(settings.messaging.queue, "track_queue");
    assert_eq!(settings.messaging.topic, "track_topic");
}

#[test]
#[serial]
fn test_env_overrides_messaging_url() {
    temp_env::with_vars([("MESSAGING_URL", Some("ws://10.0.0.5:9100"))], || {
        let settings = load_config().expect("failed to load configuration");
        assert_eq!(settings.messaging.url, "ws://10.0.0.5:9100");
        // Untouched sections keep their defaults.
        assert_eq!(settings.messaging.queue, "track_queue");
        assert_eq!(settings.server.host, "127.0.0.1");
    });
}

#[test]
#[serial]
fn test_env_overrides_destination_names() {
    temp_env::with_vars(
        [
            ("MESSAGING_QUEUE", Some("orders")),
            ("MESSAGING_TOPIC", Some("releases")),
        ],
        || {
            let settings = load_config().expect("failed to load configuration");
            assert_eq!(settings.messaging.queue, "orders");
            assert_eq!(settings.messaging.topic, "releases");
        },
    );
}

#[test]
#[serial]
fn test_env_overrides_numeric_values() {
    temp_env::with_vars([("SERVER_PORT", Some("9001"))], || {
        let settings = load_config().expect("failed to load configuration");
        assert_eq!(settings.server.port, 9001);
        assert_eq!(settings.server.host, "127.0.0.1");
    });
}
