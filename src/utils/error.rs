use thiserror::Error;

/// Errors surfaced by sessions and the demo workloads.
///
/// Worker tasks log these and move on; the single-shot binaries let them
/// abort the process.
#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("broker reported an error: {0}")]
    Broker(String),

    #[error("broker closed the connection")]
    ConnectionClosed,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
