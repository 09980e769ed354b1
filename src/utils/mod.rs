//! Shared utilities: the error type used across the client-side messaging
//! paths and the tracing setup.

pub mod error;
pub mod logging;
