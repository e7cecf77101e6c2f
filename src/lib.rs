//! # Draftview
//!
//! Client for a live card-drafting viewer. Replays a scripted draft against
//! the backend's session API and mirrors the live updates the backend pushes
//! back into a viewer model.
//!
//! ## Modules
//!
//! - [`script`]: Parse draft scripts into an action queue
//! - [`session`]: Session API client
//! - [`driver`]: Polling loop that performs one action at a time
//! - [`realtime`]: WebSocket listener for live session events
//! - [`viewer`]: Viewer model, mana chart and text renderer
//! - [`devserver`]: In-memory backend for local runs and tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use draftview::{ActionDriver, ActionQueue, HttpSessionClient, SessionClientConfig, Viewer};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let queue = ActionQueue::from_script("init\nhero mage\ncards CS2_029,EX1_277,CS2_032\n");
//!     let api = Arc::new(HttpSessionClient::new(SessionClientConfig::default())?);
//!     let viewer = Viewer::default();
//!
//!     let driver = ActionDriver::new(queue, api, viewer.clone(), Duration::from_millis(500));
//!     let report = driver.run().await;
//!
//!     println!("{} actions performed", report.executed);
//!     println!("{}", viewer.render().await);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod devserver;
pub mod driver;
pub mod logging;
pub mod realtime;
pub mod script;
pub mod session;
pub mod viewer;

pub use config::{Config, ConfigError, LoggingConfig};

pub use script::{parse_action, Action, ActionQueue, Command, ScriptError};

pub use session::{
    HttpSessionClient, Session, SessionApi, SessionClientConfig, SessionError, SessionField,
    SessionSnapshot, SessionState, UpdatePayload, ViewerPage,
};

pub use driver::{ActionDriver, DriverReport};

pub use realtime::{RealtimeConfig, RealtimeError, RealtimeListener, ServerEvent};

pub use viewer::{bucket_manas, render_text, ManaChart, Viewer, ViewerConfig, ViewerState};
