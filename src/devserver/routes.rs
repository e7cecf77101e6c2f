//! Session Routes
//!
//! - GET /session/new
//! - POST /session/update/cards/:id
//! - POST /session/update/hero/:id
//! - POST /session/update/drafted/:id
//! - GET /json/:id
//! - GET /viewer/:id

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::catalog::is_valid_hero;
use super::error::{DevServerError, DevServerResult};
use super::state::{DevState, SessionRecord, DRAFT_SIZE};
use crate::realtime::{CardsUpdated, DraftedEntry, DraftedUpdated, HeroUpdated, ServerEvent};
use crate::session::{Session, SessionSnapshot, UpdateResponse, ViewerPage};

/// Attempts at finding an unused session id
const MAX_ID_ATTEMPTS: usize = 10;

#[derive(Debug, Deserialize)]
pub struct CardsRequest {
    pub auth_token: String,
    pub cards: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct HeroRequest {
    pub auth_token: String,
    pub hero: String,
}

#[derive(Debug, Deserialize)]
pub struct DraftedRequest {
    pub auth_token: String,
    pub drafted: Vec<String>,
}

fn ok_response() -> Json<UpdateResponse> {
    Json(UpdateResponse {
        success: true,
        error: false,
    })
}

/// Card ids are stored and looked up upper-cased
fn normalize_cards(cards: &[String]) -> Vec<String> {
    cards.iter().map(|card| card.to_uppercase()).collect()
}

/// Drafted list rows, sorted by mana then name, and the mana of every pick
fn drafted_view(state: &DevState, drafted: &[String]) -> (Vec<DraftedEntry>, Vec<u32>) {
    let entries = state
        .catalog
        .sort_cards(drafted)
        .into_iter()
        .map(|card| DraftedEntry {
            mana: state.assets.mana(card.mana),
            card: state.assets.card_bar(&card.card),
            multiplicity: state.assets.multiplicity(card.multiplicity),
            full: state.assets.full_card(&card.card),
        })
        .collect();
    let manas = drafted.iter().map(|card| state.catalog.mana(card)).collect();

    (entries, manas)
}

/// Keep only alphanumeric characters of a client-supplied token
fn sanitize_token(token: &str) -> String {
    token.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Run `f` on the session if the token matches
async fn with_session<F>(
    state: &DevState,
    id: &str,
    auth_token: &str,
    f: F,
) -> DevServerResult<()>
where
    F: FnOnce(&mut SessionRecord) -> DevServerResult<()>,
{
    let mut sessions = state.sessions.write().await;
    let record = sessions
        .get_mut(id)
        .ok_or_else(|| DevServerError::NotFound(format!("session {}", id)))?;

    if record.auth_token != sanitize_token(auth_token) {
        return Err(DevServerError::Forbidden);
    }

    f(record)
}

/// GET /session/new
pub async fn new_session(State(state): State<Arc<DevState>>) -> DevServerResult<Json<Session>> {
    let mut sessions = state.sessions.write().await;

    for _ in 0..MAX_ID_ATTEMPTS {
        let session_id = Uuid::new_v4().simple().to_string();
        if sessions.contains_key(&session_id) {
            continue;
        }

        let auth_token = Uuid::new_v4().simple().to_string();
        sessions.insert(
            session_id.clone(),
            SessionRecord::new(session_id.clone(), auth_token.clone()),
        );

        tracing::info!(session_id = %session_id, "Session created");
        return Ok(Json(Session {
            session_id,
            auth_token,
        }));
    }

    Err(DevServerError::Internal(
        "could not allocate a session id".to_string(),
    ))
}

/// POST /session/update/cards/:id
pub async fn update_cards(
    State(state): State<Arc<DevState>>,
    Path(id): Path<String>,
    Json(body): Json<CardsRequest>,
) -> DevServerResult<Json<UpdateResponse>> {
    if body.cards.len() != 3 {
        return Err(DevServerError::Validation(format!(
            "expected 3 cards, got {}",
            body.cards.len()
        )));
    }

    let cards = normalize_cards(&body.cards);

    with_session(&state, &id, &body.auth_token, |record| {
        if record.is_finished() {
            return Err(DevServerError::Conflict("draft has finished".to_string()));
        }
        record.current_cards = cards.clone();
        Ok(())
    })
    .await?;

    let event = ServerEvent::CardsUpdated(CardsUpdated {
        cards: Some(cards.iter().map(|card| state.assets.full_card(card)).collect()),
    });
    state.hub.emit(&id, &event).await;

    Ok(ok_response())
}

/// POST /session/update/hero/:id
pub async fn update_hero(
    State(state): State<Arc<DevState>>,
    Path(id): Path<String>,
    Json(body): Json<HeroRequest>,
) -> DevServerResult<Json<UpdateResponse>> {
    let hero = body.hero;
    if !is_valid_hero(&hero) {
        return Err(DevServerError::Validation(format!("unknown hero {}", hero)));
    }

    with_session(&state, &id, &body.auth_token, |record| {
        record.hero = hero.clone();
        Ok(())
    })
    .await?;

    let event = ServerEvent::HeroUpdated(HeroUpdated {
        hero: Some(state.assets.hero(&hero)),
    });
    state.hub.emit(&id, &event).await;

    Ok(ok_response())
}

/// POST /session/update/drafted/:id
pub async fn update_drafted(
    State(state): State<Arc<DevState>>,
    Path(id): Path<String>,
    Json(body): Json<DraftedRequest>,
) -> DevServerResult<Json<UpdateResponse>> {
    if body.drafted.len() > DRAFT_SIZE {
        return Err(DevServerError::Validation(format!(
            "at most {} drafted cards, got {}",
            DRAFT_SIZE,
            body.drafted.len()
        )));
    }

    let picks = normalize_cards(&body.drafted);

    with_session(&state, &id, &body.auth_token, |record| {
        if record.is_finished() {
            return Err(DevServerError::Conflict("draft has finished".to_string()));
        }
        record.drafted = picks.clone();
        Ok(())
    })
    .await?;

    let (drafted, manas) = drafted_view(&state, &picks);

    let event = ServerEvent::DraftedUpdated(DraftedUpdated {
        drafted: Some(drafted),
        manas: Some(manas),
    });
    state.hub.emit(&id, &event).await;

    if picks.len() == DRAFT_SIZE {
        state.hub.emit(&id, &ServerEvent::DraftFinished).await;
    }

    Ok(ok_response())
}

/// GET /json/:id
pub async fn session_json(
    State(state): State<Arc<DevState>>,
    Path(id): Path<String>,
) -> DevServerResult<Json<SessionSnapshot>> {
    let sessions = state.sessions.read().await;
    sessions
        .get(&id)
        .map(|record| Json(record.snapshot()))
        .ok_or_else(|| DevServerError::NotFound(format!("session {}", id)))
}

/// GET /viewer/:id
pub async fn viewer_page(
    State(state): State<Arc<DevState>>,
    Path(id): Path<String>,
) -> DevServerResult<Json<ViewerPage>> {
    let sessions = state.sessions.read().await;
    let record = sessions
        .get(&id)
        .ok_or_else(|| DevServerError::NotFound(format!("session {}", id)))?;

    let (drafted, manas) = drafted_view(&state, &record.drafted);

    Ok(Json(ViewerPage {
        session_id: record.session_id.clone(),
        hero: state.assets.hero(&record.hero),
        cards: record
            .current_cards
            .iter()
            .map(|card| state.assets.full_card(card))
            .collect(),
        drafted,
        manas,
        finished: record.is_finished(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_cards() {
        let cards = vec!["cs2_029".to_string(), "EX1_277".to_string()];
        assert_eq!(normalize_cards(&cards), vec!["CS2_029", "EX1_277"]);
    }

    #[test]
    fn test_sanitize_token() {
        assert_eq!(sanitize_token("abc123"), "abc123");
        assert_eq!(sanitize_token("{\"$ne\": 1}"), "ne1");
        assert_eq!(sanitize_token(".*"), "");
    }
}
