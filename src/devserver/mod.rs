//! Development Backend
//!
//! In-memory stand-in for the drafting backend, built with Axum. It speaks
//! the same session API and real-time protocol as the real service so the
//! client can be run and tested end to end without a database.
//!
//! # Endpoints
//!
//! - `GET /session/new` - Create a session
//! - `POST /session/update/cards/:id` - Three cards on offer
//! - `POST /session/update/hero/:id` - Hero pick
//! - `POST /session/update/drafted/:id` - Drafted list (at most 30)
//! - `GET /json/:id` - Session snapshot without auth token
//! - `GET /viewer/:id` - Viewer starting state as image URLs
//! - `GET /ws` - Real-time channel

pub mod catalog;
pub mod error;
pub mod handler;
pub mod hub;
pub mod routes;
pub mod state;

pub use catalog::{AssetUrls, CardCatalog, SortedCard, VALID_HERO_IDS};
pub use error::{DevServerError, DevServerResult};
pub use hub::{HubConfig, HubError, RoomHub};
pub use state::{DevState, SessionRecord, DRAFT_SIZE};

use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::DevServerSettings;

/// Build the router with all routes and middleware
pub fn build_router(state: DevState) -> Router {
    Router::new()
        .route("/session/new", get(routes::new_session))
        .route("/session/update/cards/:id", post(routes::update_cards))
        .route("/session/update/hero/:id", post(routes::update_hero))
        .route("/session/update/drafted/:id", post(routes::update_drafted))
        .route("/json/:id", get(routes::session_json))
        .route("/viewer/:id", get(routes::viewer_page))
        .route("/ws", get(handler::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Build state from settings, loading the card catalog if one is configured
pub fn state_from_settings(settings: &DevServerSettings) -> DevServerResult<DevState> {
    let catalog = match &settings.cards_path {
        Some(path) => {
            let catalog = CardCatalog::load(Path::new(path))?;
            tracing::info!(cards = catalog.len(), path = %path, "Loaded card catalog");
            catalog
        }
        None => {
            tracing::warn!("No card catalog configured; every card costs 0");
            CardCatalog::default()
        }
    };

    Ok(DevState::new(catalog, AssetUrls::default()))
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve_on<F>(listener: TcpListener, state: DevState, shutdown: F) -> DevServerResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

/// Bind to the configured address and serve until Ctrl+C
pub async fn serve(settings: &DevServerSettings) -> DevServerResult<()> {
    let state = state_from_settings(settings)?;

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Draft dev server listening on {}", addr);

    serve_on(listener, state, shutdown_signal()).await?;

    tracing::info!("Draft dev server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
