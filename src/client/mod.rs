//! The `client` module defines the broker-side representation of a connected
//! client.
//!
//! A [`Client`] holds the id the routing tables key on and the sending half
//! of the per-connection channel the transport layer drains back into the
//! socket.

pub mod pubsub_client;
pub use pubsub_client::Client;
