//! # tracksub
//!
//! `tracksub` is a minimalist message broker for track records, built with
//! Rust. It offers both point-to-point queues (each message reaches exactly
//! one consumer) and broadcast topics (each message reaches every currently
//! subscribed consumer), speaking JSON frames over WebSockets.
//!
//! ## Core Modules
//!
//! - `broker`: the routing core managing topics, queues, clients and
//!   message hand-off.
//! - `client`: the broker-side representation of a connected client.
//! - `config`: loading and merging server and messaging configuration.
//! - `demo`: one-shot producer/consumer roles and the round driver.
//! - `persistence`: sled-backed storage for persistent-delivery messages.
//! - `session`: the client-side connection used by producers and consumers.
//! - `track`: the four-field record every workload exchanges.
//! - `transport`: the WebSocket server and the wire protocol.
//! - `utils`: error type and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod demo;
pub mod persistence;
pub mod session;
pub mod track;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod tests;
