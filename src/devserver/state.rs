//! Dev server state
//!
//! In-memory session store shared by all handlers.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::catalog::{AssetUrls, CardCatalog};
use super::hub::RoomHub;
use crate::session::SessionSnapshot;

/// Drafts end after this many picks
pub const DRAFT_SIZE: usize = 30;

/// Stored state of one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub session_id: String,
    pub auth_token: String,
    pub current_cards: Vec<String>,
    pub drafted: Vec<String>,
    pub hero: String,
}

impl SessionRecord {
    pub fn new(session_id: String, auth_token: String) -> Self {
        Self {
            session_id,
            auth_token,
            current_cards: vec![String::new(); 3],
            drafted: Vec::new(),
            hero: "no_hero".to_string(),
        }
    }

    pub fn num_drafted(&self) -> usize {
        self.drafted.len()
    }

    pub fn is_finished(&self) -> bool {
        self.num_drafted() >= DRAFT_SIZE
    }

    /// Public view, without the auth token
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            current_cards: self.current_cards.clone(),
            drafted: self.drafted.clone(),
            num_drafted: self.num_drafted(),
            hero: self.hero.clone(),
        }
    }
}

/// Shared state for all dev server handlers
pub struct DevState {
    pub sessions: RwLock<HashMap<String, SessionRecord>>,
    pub catalog: CardCatalog,
    pub assets: AssetUrls,
    pub hub: Arc<RoomHub>,
}

impl DevState {
    pub fn new(catalog: CardCatalog, assets: AssetUrls) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            catalog,
            assets,
            hub: Arc::new(RoomHub::default()),
        }
    }
}

impl Default for DevState {
    fn default() -> Self {
        Self::new(CardCatalog::default(), AssetUrls::default())
    }
}
