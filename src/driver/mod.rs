//! Action Driver
//!
//! Drains the scripted action queue against the session API, one operation
//! at a time.

mod runner;

pub use runner::{ActionDriver, DriverReport};
