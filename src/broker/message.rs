use serde::{Deserialize, Serialize};

/// A message routed through the broker.
///
/// `destination` names either a queue or a topic; the broker keeps the two
/// namespaces separate. `payload` is usually a JSON-encoded
/// [`Track`](crate::track::Track), but the broker itself treats it as an
/// opaque string. `timestamp` is Unix milliseconds stamped by the sender.
///
/// A delivery to a client is this struct serialized to JSON, exactly as it
/// was handed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub destination: String,
    pub payload: String,
    pub timestamp: i64,
}
