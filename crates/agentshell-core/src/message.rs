//! Conversation Turns
//!
//! The ordered, append-only record of a conversation with one shell.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Empty-log sentinel returned by [`ConversationLog::summarize`]
pub const NO_HISTORY: &str = "No conversation history.";

/// Longest turn text rendered verbatim in a summary
pub const SUMMARY_TEXT_LIMIT: usize = 100;

const CONTINUATION: &str = "...";

/// Who produced a turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User input
    User,
    /// Reply from the shell (tool output or model response)
    Agent,
}

impl Role {
    /// Label used in conversation summaries
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Agent => "AI",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Agent => write!(f, "agent"),
        }
    }
}

/// A single recorded message
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Turn role
    pub role: Role,

    /// Text content
    pub text: String,

    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Role::Agent, text)
    }

    /// Render as a single summary line, truncating long text
    fn summary_line(&self) -> String {
        format!(
            "{}: {}",
            self.role.label(),
            truncate_for_display(&single_line(&self.text))
        )
    }
}

/// Join the lines of `text` with spaces
fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cut `text` to [`SUMMARY_TEXT_LIMIT`] characters, marker included
fn truncate_for_display(text: &str) -> String {
    if text.chars().count() <= SUMMARY_TEXT_LIMIT {
        return text.to_string();
    }
    let keep = SUMMARY_TEXT_LIMIT - CONTINUATION.len();
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(CONTINUATION);
    out
}

/// Append-only conversation history owned by one shell
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a turn
    pub fn append(&mut self, role: Role, text: impl Into<String>) {
        self.turns.push(Turn::new(role, text));
    }

    /// Drop every turn
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Render the last `window` turns, oldest first, one line each.
    ///
    /// Display only: the stored turns are never touched.
    pub fn summarize(&self, window: usize) -> String {
        if self.turns.is_empty() {
            return NO_HISTORY.to_string();
        }

        let start = self.turns.len().saturating_sub(window);
        self.turns[start..]
            .iter()
            .map(Turn::summary_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// All turns in append order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut log = ConversationLog::new();
        log.append(Role::User, "Hi");
        log.append(Role::Agent, "Hello!");

        assert_eq!(log.len(), 2);
        assert_eq!(log.turns()[0].role, Role::User);
        assert_eq!(log.last().unwrap().text, "Hello!");
    }

    #[test]
    fn test_summarize_empty() {
        let log = ConversationLog::new();
        assert_eq!(log.summarize(5), NO_HISTORY);
    }

    #[test]
    fn test_summarize_window_keeps_newest() {
        let mut log = ConversationLog::new();
        for i in 0..8 {
            log.append(if i % 2 == 0 { Role::User } else { Role::Agent }, format!("m{i}"));
        }

        let summary = log.summarize(5);
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "AI: m3");
        assert_eq!(lines[4], "User: m7");
    }

    #[test]
    fn test_summarize_shorter_than_window() {
        let mut log = ConversationLog::new();
        log.append(Role::User, "only one");
        assert_eq!(log.summarize(5), "User: only one");
    }

    #[test]
    fn test_summarize_truncates_long_text() {
        let mut log = ConversationLog::new();
        log.append(Role::User, "a".repeat(150));
        log.append(Role::Agent, "b".repeat(100));

        let summary = log.summarize(5);
        let lines: Vec<&str> = summary.lines().collect();

        let first = lines[0].strip_prefix("User: ").unwrap();
        assert_eq!(first.chars().count(), SUMMARY_TEXT_LIMIT);
        assert!(first.ends_with("..."));

        // exactly at the limit is left alone
        assert_eq!(lines[1], format!("AI: {}", "b".repeat(100)));

        // stored text is untouched
        assert_eq!(log.turns()[0].text.len(), 150);
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let text = "é".repeat(120);
        let shown = truncate_for_display(&text);
        assert_eq!(shown.chars().count(), SUMMARY_TEXT_LIMIT);
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let mut log = ConversationLog::new();
        log.append(Role::User, "ping");
        log.append(Role::Agent, "pong");
        assert_eq!(log.summarize(5), log.summarize(5));
    }

    #[test]
    fn test_clear_resets_summary() {
        let mut log = ConversationLog::new();
        log.append(Role::User, "ping");
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.summarize(5), NO_HISTORY);
    }

    #[test]
    fn test_multiline_turn_is_one_line() {
        let mut log = ConversationLog::new();
        log.append(Role::User, "list three things");
        log.append(Role::Agent, "1. a\n2. b\r\n3. c");

        let summary = log.summarize(2);
        assert_eq!(summary.lines().count(), 2);
        assert_eq!(summary, "User: list three things\nAI: 1. a 2. b 3. c");
        assert_eq!(log.last().unwrap().text, "1. a\n2. b\r\n3. c");
    }

    #[test]
    fn test_zero_window_renders_nothing() {
        let mut log = ConversationLog::new();
        log.append(Role::User, "ping");
        assert_eq!(log.summarize(0), "");
    }
}
