use serde::{Deserialize, Serialize};

/// Frames a client may send to the broker.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "subscribe")]
    Subscribe { topic: String },

    #[serde(rename = "unsubscribe")]
    Unsubscribe { topic: String },

    #[serde(rename = "publish")]
    Publish {
        topic: String,
        payload: String,
        timestamp: i64,
        #[serde(default)]
        persistent: bool,
    },

    #[serde(rename = "send")]
    Send {
        queue: String,
        payload: String,
        timestamp: i64,
        #[serde(default)]
        persistent: bool,
    },

    #[serde(rename = "receive")]
    Receive { queue: String },
}

/// Acknowledgment and error frames the broker sends back.
///
/// Deliveries are not wrapped in this enum: a delivered message is the bare
/// serialized [`Message`](crate::broker::message::Message), so consumers can
/// tell the two apart by the presence of the `type` tag.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// The subscription is registered; publishes from this point on will
    /// reach the subscriber.
    #[serde(rename = "subscribed")]
    Subscribed { topic: String },

    /// The receive request is registered (serviced or parked).
    #[serde(rename = "receiving")]
    Receiving { queue: String },

    #[serde(rename = "error")]
    Error { message: String },
}
