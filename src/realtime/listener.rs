//! Real-Time Listener
//!
//! Connects to the backend's WebSocket endpoint, joins the room for a
//! session, and applies every pushed event to the viewer. Reconnects with
//! exponential backoff when the connection drops.

use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::error::{RealtimeError, RealtimeResult};
use super::messages::{ClientEvent, ServerEvent};
use crate::viewer::Viewer;

/// Settings for the real-time listener
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// WebSocket URL, e.g. "ws://localhost:5000/ws"
    pub url: String,
    /// Reconnect attempts before giving up
    pub max_reconnect_attempts: u32,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:5000/ws".to_string(),
            max_reconnect_attempts: 5,
        }
    }
}

impl RealtimeConfig {
    /// Derive the WebSocket URL from the HTTP base URL of the backend
    pub fn from_base_url(base_url: &str, ws_path: &str) -> Self {
        let base = base_url
            .trim_end_matches('/')
            .replacen("https://", "wss://", 1)
            .replacen("http://", "ws://", 1);

        Self {
            url: format!("{}/{}", base, ws_path.trim_start_matches('/')),
            ..Default::default()
        }
    }
}

/// How a single connection ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionEnd {
    /// Server announced the draft is over
    Finished,
    /// Socket closed or errored; worth reconnecting
    Dropped,
}

/// Backoff before reconnect attempt `attempt` (0-based): 1s, 2s, 4s... capped at 30s
pub fn reconnect_delay(attempt: u32) -> Duration {
    let millis = 2u64.saturating_pow(attempt).saturating_mul(1000).min(30_000);
    Duration::from_millis(millis)
}

/// Decode one text frame and apply it to the viewer
///
/// Returns the decoded event, or `None` if the frame was malformed.
pub async fn dispatch(text: &str, viewer: &Viewer) -> Option<ServerEvent> {
    match ServerEvent::decode(text) {
        Ok(event) => {
            let applied = viewer.apply(&event).await;
            tracing::debug!(event = %event.name(), applied, "Real-time event");
            Some(event)
        }
        Err(e) => {
            tracing::warn!(error = %e, text = %text, "Failed to parse real-time message");
            None
        }
    }
}

/// Listens for session updates and patches the viewer
pub struct RealtimeListener {
    config: RealtimeConfig,
    viewer: Viewer,
}

impl RealtimeListener {
    pub fn new(config: RealtimeConfig, viewer: Viewer) -> Self {
        Self { config, viewer }
    }

    /// Listen until the draft finishes or reconnects are exhausted
    pub async fn run(&self, session_id: &str) -> RealtimeResult<()> {
        let mut attempts = 0u32;

        loop {
            match self.connect_once(session_id).await {
                Ok(ConnectionEnd::Finished) => {
                    tracing::info!(session_id = %session_id, "Draft finished, closing listener");
                    return Ok(());
                }
                Ok(ConnectionEnd::Dropped) => {
                    // A connection that got as far as joining resets the backoff
                    attempts = 0;
                    tracing::warn!(session_id = %session_id, "Real-time connection closed");
                }
                Err(e) => {
                    tracing::error!(error = %e, url = %self.config.url, "Real-time connection failed");
                }
            }

            if attempts >= self.config.max_reconnect_attempts {
                tracing::error!("Max reconnect attempts reached");
                return Err(RealtimeError::ReconnectLimit(attempts));
            }

            let delay = reconnect_delay(attempts);
            attempts += 1;
            tracing::info!(attempt = attempts, delay_ms = delay.as_millis() as u64, "Reconnecting");
            tokio::time::sleep(delay).await;
        }
    }

    async fn connect_once(&self, session_id: &str) -> RealtimeResult<ConnectionEnd> {
        let (stream, _) = connect_async(self.config.url.as_str()).await?;
        let (mut sender, mut receiver) = stream.split();

        sender
            .send(Message::Text(ClientEvent::join(session_id).encode()?))
            .await?;
        tracing::info!(session_id = %session_id, "Joined session room");

        while let Some(result) = receiver.next().await {
            let message = match result {
                Ok(message) => message,
                Err(e) => {
                    tracing::debug!(error = %e, "WebSocket receive error");
                    return Ok(ConnectionEnd::Dropped);
                }
            };

            match message {
                Message::Text(text) => {
                    if let Some(ServerEvent::DraftFinished) = dispatch(&text, &self.viewer).await {
                        let _ = sender.send(Message::Close(None)).await;
                        return Ok(ConnectionEnd::Finished);
                    }
                }
                Message::Ping(payload) => {
                    sender.send(Message::Pong(payload)).await?;
                }
                Message::Close(_) => return Ok(ConnectionEnd::Dropped),
                _ => {}
            }
        }

        Ok(ConnectionEnd::Dropped)
    }
}
