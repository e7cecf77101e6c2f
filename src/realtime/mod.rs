//! Real-Time Channel
//!
//! Live session updates pushed from the backend to viewers.
//!
//! ## Events
//!
//! - `cards_updated` - `{cards: [url, url, url]}`
//! - `hero_updated` - `{hero: url}`
//! - `drafted_updated` - `{drafted: [{mana, card, multiplicity, full}], manas: [n]}`
//! - `draft_finished` - no payload
//!
//! Viewers send `{"event": "join", "data": {"id": <session_id>}}` after
//! connecting to receive a session's events.

mod error;
mod listener;
mod messages;

pub use error::{RealtimeError, RealtimeResult};
pub use listener::{dispatch, reconnect_delay, RealtimeConfig, RealtimeListener};
pub use messages::{
    CardsUpdated, ClientEvent, DraftedEntry, DraftedUpdated, Envelope, HeroUpdated, ServerEvent,
};
