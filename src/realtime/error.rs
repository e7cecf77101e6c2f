//! Real-time channel error types

use thiserror::Error;

/// Errors that can occur on the real-time channel
#[derive(Error, Debug)]
pub enum RealtimeError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Gave up after {0} reconnect attempts")]
    ReconnectLimit(u32),
}

/// Result type alias for real-time operations
pub type RealtimeResult<T> = Result<T, RealtimeError>;
