//! Scripted Actions
//!
//! Parses draft scripts into a queue of actions for the driver.
//!
//! ## Format
//!
//! One action per line, `#` starts a comment:
//!
//! ```text
//! init                         # create a session
//! hero mage
//! cards CS2_029, EX1_277, CS2_032
//! drafted CS2_029
//! ```

mod action;
mod error;
mod queue;

pub use action::{parse_action, Action, Command};
pub use error::{ScriptError, ScriptResult};
pub use queue::ActionQueue;
