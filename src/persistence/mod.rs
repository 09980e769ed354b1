//! The `persistence` module stores messages flagged with persistent delivery.
//!
//! It uses `sled` as an embedded key-value store, one tree per destination.
//! Non-persistent traffic never touches it.

pub mod sled_store;
