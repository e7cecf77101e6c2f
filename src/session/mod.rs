//! Session API
//!
//! Client for the drafting backend.
//!
//! ## Endpoints
//!
//! - `GET /session/new` - Create a session, returns `{session_id, auth_token}`
//! - `POST /session/update/{cards|drafted|hero}/{id}` - Update one field
//! - `GET /json/{id}` - Public session snapshot
//! - `GET /viewer/{id}` - Starting state for a spectator joining mid-draft

mod client;
mod error;
mod types;

pub use client::{HttpSessionClient, SessionApi, SessionClientConfig};
pub use error::{SessionError, SessionResult};
pub use types::{
    Session, SessionField, SessionSnapshot, SessionState, UpdatePayload, UpdateResponse,
    ViewerPage,
};
