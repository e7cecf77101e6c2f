//! Action parsing
//!
//! A script line looks like `<type> <data>  # optional comment`. The type is
//! everything up to the first space; the data is everything after it with all
//! spaces removed, so `drafted EX1_001, EX1_002` and `drafted EX1_001,EX1_002`
//! are the same action.

use serde::{Deserialize, Serialize};

use super::error::{ScriptError, ScriptResult};

/// One scripted instruction, as written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: String,
    pub data: Option<String>,
}

/// Typed form of an [`Action`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a new session
    Init,
    /// Replace the three cards currently on offer
    Cards(Vec<String>),
    /// Replace the list of drafted cards
    Drafted(Vec<String>),
    /// Set the hero
    Hero(String),
}

impl Command {
    /// Action type name, as used in scripts and endpoint paths
    pub fn name(&self) -> &'static str {
        match self {
            Command::Init => "init",
            Command::Cards(_) => "cards",
            Command::Drafted(_) => "drafted",
            Command::Hero(_) => "hero",
        }
    }
}

/// Strip the comment part of a line and any trailing whitespace
pub(crate) fn strip_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or_default().trim_end()
}

/// Parse a single script line into an [`Action`]
pub fn parse_action(line: &str) -> Action {
    let line = strip_comment(line);

    match line.split_once(' ') {
        Some((action_type, rest)) => Action {
            action_type: action_type.to_string(),
            data: Some(rest.replace(' ', "")),
        },
        None => Action {
            action_type: line.to_string(),
            data: None,
        },
    }
}

impl Action {
    /// Convert into a [`Command`], validating that required data is present
    pub fn into_command(self) -> ScriptResult<Command> {
        match self.action_type.as_str() {
            "init" => Ok(Command::Init),
            "cards" => Ok(Command::Cards(self.require_list()?)),
            "drafted" => Ok(Command::Drafted(self.require_list()?)),
            "hero" => match self.data {
                Some(hero) if !hero.is_empty() => Ok(Command::Hero(hero)),
                _ => Err(ScriptError::MissingData(self.action_type)),
            },
            _ => Err(ScriptError::UnknownAction(self.action_type)),
        }
    }

    fn require_list(&self) -> ScriptResult<Vec<String>> {
        let data = self
            .data
            .as_deref()
            .ok_or_else(|| ScriptError::MissingData(self.action_type.clone()))?;

        Ok(data
            .split(',')
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect())
    }
}
