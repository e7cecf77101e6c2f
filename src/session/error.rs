//! Session API error types

use thiserror::Error;

/// Errors that can occur when talking to the session API
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session API unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("No session yet; run init first")]
    NotInitialized,
}

impl SessionError {
    /// Classify a transport error the same way for every call
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SessionError::Timeout
        } else if err.is_connect() {
            SessionError::Unavailable
        } else {
            SessionError::Request(err)
        }
    }
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
