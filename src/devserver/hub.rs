//! Room Hub
//!
//! Tracks WebSocket connections and the session rooms they joined. Events
//! for a session go to every connection in that session's room.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::realtime::ServerEvent;

/// Unique identifier for a WebSocket connection
pub type ConnectionId = String;

#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 1000,
        }
    }
}

struct ConnectionHandle {
    sender: mpsc::UnboundedSender<ServerEvent>,
    rooms: HashSet<String>,
}

/// Connection registry with per-session rooms
pub struct RoomHub {
    connections: Arc<RwLock<HashMap<ConnectionId, ConnectionHandle>>>,
    rooms: Arc<RwLock<HashMap<String, HashSet<ConnectionId>>>>,
    config: HubConfig,
}

impl RoomHub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
            rooms: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Register a new connection, failing once the limit is reached
    pub async fn register(
        &self,
        sender: mpsc::UnboundedSender<ServerEvent>,
    ) -> Result<ConnectionId, HubError> {
        let mut connections = self.connections.write().await;
        if connections.len() >= self.config.max_connections {
            return Err(HubError::TooManyConnections(self.config.max_connections));
        }

        let id = Uuid::new_v4().to_string();
        connections.insert(
            id.clone(),
            ConnectionHandle {
                sender,
                rooms: HashSet::new(),
            },
        );

        tracing::info!(connection_id = %id, "WebSocket connected");
        Ok(id)
    }

    /// Drop a connection and remove it from every room
    pub async fn unregister(&self, id: &str) {
        let handle = self.connections.write().await.remove(id);

        if let Some(handle) = handle {
            let mut rooms = self.rooms.write().await;
            for room in handle.rooms {
                if let Some(members) = rooms.get_mut(&room) {
                    members.remove(id);
                    if members.is_empty() {
                        rooms.remove(&room);
                    }
                }
            }
        }

        tracing::info!(connection_id = %id, "WebSocket disconnected");
    }

    /// Add a connection to a session's room
    pub async fn join(&self, id: &str, room: &str) -> Result<(), HubError> {
        let mut connections = self.connections.write().await;
        let handle = connections
            .get_mut(id)
            .ok_or(HubError::ConnectionNotFound)?;

        handle.rooms.insert(room.to_string());
        self.rooms
            .write()
            .await
            .entry(room.to_string())
            .or_default()
            .insert(id.to_string());

        tracing::info!(connection_id = %id, room = %room, "Joined room");
        Ok(())
    }

    /// Send an event to every member of a room. Returns how many received it.
    pub async fn emit(&self, room: &str, event: &ServerEvent) -> usize {
        let connections = self.connections.read().await;
        let rooms = self.rooms.read().await;

        let Some(members) = rooms.get(room) else {
            return 0;
        };

        let sent = members
            .iter()
            .filter_map(|id| connections.get(id))
            .filter(|handle| handle.sender.send(event.clone()).is_ok())
            .count();

        tracing::debug!(room = %room, event = %event.name(), recipients = sent, "Emitted event");
        sent
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn room_size(&self, room: &str) -> usize {
        self.rooms
            .read()
            .await
            .get(room)
            .map(|members| members.len())
            .unwrap_or(0)
    }
}

impl Default for RoomHub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}

#[derive(Debug, Error)]
pub enum HubError {
    #[error("Too many connections (limit: {0})")]
    TooManyConnections(usize),

    #[error("Connection not found")]
    ConnectionNotFound,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::HeroUpdated;

    fn hero_event() -> ServerEvent {
        ServerEvent::HeroUpdated(HeroUpdated {
            hero: Some("mage.png".to_string()),
        })
    }

    #[tokio::test]
    async fn test_register_unregister() {
        let hub = RoomHub::default();
        let (tx, _rx) = mpsc::unbounded_channel();

        let id = hub.register(tx).await.unwrap();
        hub.join(&id, "sess").await.unwrap();
        assert_eq!(hub.connection_count().await, 1);
        assert_eq!(hub.room_size("sess").await, 1);

        hub.unregister(&id).await;
        assert_eq!(hub.connection_count().await, 0);
        assert_eq!(hub.room_size("sess").await, 0);
    }

    #[tokio::test]
    async fn test_connection_limit() {
        let hub = RoomHub::new(HubConfig { max_connections: 1 });
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        hub.register(tx1).await.unwrap();
        let result = hub.register(tx2).await;
        assert!(matches!(result, Err(HubError::TooManyConnections(1))));
    }

    #[tokio::test]
    async fn test_emit_only_reaches_room() {
        let hub = RoomHub::default();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();

        let id1 = hub.register(tx1).await.unwrap();
        let id2 = hub.register(tx2).await.unwrap();
        hub.join(&id1, "a").await.unwrap();
        hub.join(&id2, "b").await.unwrap();

        assert_eq!(hub.emit("a", &hero_event()).await, 1);
        assert_eq!(rx1.try_recv().unwrap(), hero_event());
        assert!(rx2.try_recv().is_err());

        assert_eq!(hub.emit("nobody", &hero_event()).await, 0);
    }

    #[tokio::test]
    async fn test_join_unknown_connection() {
        let hub = RoomHub::default();
        let result = hub.join("missing", "room").await;
        assert!(matches!(result, Err(HubError::ConnectionNotFound)));
    }
}
