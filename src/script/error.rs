//! Script error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or interpreting a script
#[derive(Error, Debug)]
pub enum ScriptError {
    /// Script file could not be read
    #[error("Failed to read script {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    /// Action type is not one the driver understands
    #[error("Unknown action type: {0:?}")]
    UnknownAction(String),

    /// Action requires a data argument but none was given
    #[error("Action {0:?} requires data")]
    MissingData(String),
}

/// Result type alias for script operations
pub type ScriptResult<T> = Result<T, ScriptError>;
