//! Action queue
//!
//! FIFO of raw script lines. Lines are parsed lazily when popped.

use std::collections::VecDeque;
use std::path::Path;

use super::action::{parse_action, strip_comment, Action};
use super::error::{ScriptError, ScriptResult};

/// Queue of scripted actions waiting to be performed
#[derive(Debug, Clone, Default)]
pub struct ActionQueue {
    lines: VecDeque<String>,
}

impl ActionQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a queue from script text, skipping blank and comment-only lines
    pub fn from_script(text: &str) -> Self {
        let lines = text
            .lines()
            .filter(|line| !strip_comment(line).trim().is_empty())
            .map(str::to_string)
            .collect();

        Self { lines }
    }

    /// Load a script file
    pub fn load(path: &Path) -> ScriptResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ScriptError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(Self::from_script(&text))
    }

    /// Append a raw line
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    /// Remove the front line and parse it
    pub fn next_action(&mut self) -> Option<Action> {
        self.lines.pop_front().map(|line| parse_action(&line))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SCRIPT: &str = "\
# sample draft
init

hero warrior # pick a class
cards CS2_029,EX1_277,CS2_032
drafted CS2_029
";

    #[test]
    fn test_from_script_skips_blank_and_comments() {
        let queue = ActionQueue::from_script(SCRIPT);
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn test_next_action_is_fifo() {
        let mut queue = ActionQueue::from_script(SCRIPT);

        assert_eq!(queue.next_action().unwrap().action_type, "init");
        let hero = queue.next_action().unwrap();
        assert_eq!(hero.action_type, "hero");
        assert_eq!(hero.data.as_deref(), Some("warrior"));
        assert_eq!(queue.next_action().unwrap().action_type, "cards");
        assert_eq!(queue.next_action().unwrap().action_type, "drafted");
        assert!(queue.next_action().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_push() {
        let mut queue = ActionQueue::new();
        queue.push("init");
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCRIPT.as_bytes()).unwrap();

        let queue = ActionQueue::load(file.path()).unwrap();
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ActionQueue::load(Path::new("/nonexistent/draft.txt"));
        assert!(matches!(result, Err(ScriptError::Io { .. })));
    }
}
