//! Session data types

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::realtime::DraftedEntry;

/// Identifier pair issued by the backend for one drafting session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub auth_token: String,
}

/// Holds the current session, empty until init completes
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, session: Session) {
        *self.inner.write().await = Some(session);
    }

    pub async fn get(&self) -> Option<Session> {
        self.inner.read().await.clone()
    }

    pub async fn is_initialized(&self) -> bool {
        self.inner.read().await.is_some()
    }
}

/// Session field an update targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionField {
    Cards,
    Drafted,
    Hero,
}

impl SessionField {
    /// Endpoint path segment and JSON body key
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionField::Cards => "cards",
            SessionField::Drafted => "drafted",
            SessionField::Hero => "hero",
        }
    }
}

impl std::fmt::Display for SessionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value sent for an update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UpdatePayload {
    List(Vec<String>),
    Single(String),
}

/// Body returned by update endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: bool,
}

/// Public view of a session, without the auth token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub current_cards: Vec<String>,
    pub drafted: Vec<String>,
    pub num_drafted: usize,
    pub hero: String,
}

/// Starting state of a session's viewer, as image URLs
///
/// Same shapes as the real-time events, so a viewer that joins halfway
/// through a draft can catch up before listening.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ViewerPage {
    pub session_id: String,
    pub hero: String,
    pub cards: Vec<String>,
    pub drafted: Vec<DraftedEntry>,
    pub manas: Vec<u32>,
    #[serde(default)]
    pub finished: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_state_empty_until_set() {
        let state = SessionState::new();
        assert!(!state.is_initialized().await);
        assert!(state.get().await.is_none());

        state
            .set(Session {
                session_id: "abc".to_string(),
                auth_token: "tok".to_string(),
            })
            .await;

        assert!(state.is_initialized().await);
        assert_eq!(state.get().await.unwrap().session_id, "abc");
    }

    #[test]
    fn test_payload_serializes_untagged() {
        let list = UpdatePayload::List(vec!["A".to_string(), "B".to_string()]);
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["A","B"]"#);

        let single = UpdatePayload::Single("mage".to_string());
        assert_eq!(serde_json::to_string(&single).unwrap(), r#""mage""#);
    }

    #[test]
    fn test_viewer_page_finished_defaults_to_false() {
        let page: ViewerPage = serde_json::from_str(
            r#"{"session_id": "s", "hero": "h.png", "cards": [], "drafted": [], "manas": []}"#,
        )
        .unwrap();
        assert!(!page.finished);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(SessionField::Cards.to_string(), "cards");
        assert_eq!(SessionField::Drafted.as_str(), "drafted");
        assert_eq!(SessionField::Hero.as_str(), "hero");
    }
}
