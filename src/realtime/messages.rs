//! Real-Time Message Types
//!
//! Every frame is a JSON envelope `{"event": <name>, "data": {...}}`.
//! Payload fields are optional on decode so that a frame missing a key can
//! be ignored by the viewer instead of failing the whole connection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{RealtimeError, RealtimeResult};

/// Raw wire envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub event: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

/// Messages sent from a viewer to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Join the room for a session
    Join { id: String },
}

/// Messages pushed from the server to viewers
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// The three cards on offer changed
    CardsUpdated(CardsUpdated),
    /// The hero changed
    HeroUpdated(HeroUpdated),
    /// The drafted list changed
    DraftedUpdated(DraftedUpdated),
    /// All picks are in; viewers may disconnect
    DraftFinished,
    /// Any event name this client does not handle
    Unknown(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardsUpdated {
    /// Image URLs for `card_zero`, `card_one`, `card_two`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroUpdated {
    /// Image URL for the hero portrait
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftedUpdated {
    /// Drafted cards, already sorted by mana then name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drafted: Option<Vec<DraftedEntry>>,
    /// Mana cost of every drafted card, duplicates included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manas: Option<Vec<u32>>,
}

/// Image URLs for one row of the drafted list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftedEntry {
    pub mana: String,
    pub card: String,
    pub multiplicity: String,
    #[serde(default)]
    pub full: String,
}

impl ClientEvent {
    pub fn join(id: impl Into<String>) -> Self {
        ClientEvent::Join { id: id.into() }
    }

    pub fn encode(&self) -> RealtimeResult<String> {
        let envelope = match self {
            ClientEvent::Join { id } => Envelope {
                event: "join".to_string(),
                data: serde_json::json!({ "id": id }),
            },
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    pub fn decode(text: &str) -> RealtimeResult<Self> {
        let envelope: Envelope = serde_json::from_str(text)?;
        match envelope.event.as_str() {
            "join" => {
                let id = envelope
                    .data
                    .get("id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| RealtimeError::Protocol("join requires an id".to_string()))?;
                Ok(ClientEvent::join(id))
            }
            other => Err(RealtimeError::Protocol(format!(
                "unknown client event: {}",
                other
            ))),
        }
    }
}

impl ServerEvent {
    /// Wire name of this event
    pub fn name(&self) -> &str {
        match self {
            ServerEvent::CardsUpdated(_) => "cards_updated",
            ServerEvent::HeroUpdated(_) => "hero_updated",
            ServerEvent::DraftedUpdated(_) => "drafted_updated",
            ServerEvent::DraftFinished => "draft_finished",
            ServerEvent::Unknown(name) => name,
        }
    }

    pub fn decode(text: &str) -> RealtimeResult<Self> {
        let envelope: Envelope = serde_json::from_str(text)?;
        let data = match envelope.data {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        let event = match envelope.event.as_str() {
            "cards_updated" => ServerEvent::CardsUpdated(serde_json::from_value(data)?),
            "hero_updated" => ServerEvent::HeroUpdated(serde_json::from_value(data)?),
            "drafted_updated" => ServerEvent::DraftedUpdated(serde_json::from_value(data)?),
            "draft_finished" => ServerEvent::DraftFinished,
            _ => ServerEvent::Unknown(envelope.event),
        };

        Ok(event)
    }

    pub fn encode(&self) -> RealtimeResult<String> {
        let data = match self {
            ServerEvent::CardsUpdated(payload) => serde_json::to_value(payload)?,
            ServerEvent::HeroUpdated(payload) => serde_json::to_value(payload)?,
            ServerEvent::DraftedUpdated(payload) => serde_json::to_value(payload)?,
            ServerEvent::DraftFinished | ServerEvent::Unknown(_) => Value::Null,
        };

        let envelope = Envelope {
            event: self.name().to_string(),
            data,
        };
        Ok(serde_json::to_string(&envelope)?)
    }
}
