//! # Notice Service
//!
//! Structured user-visible notices for non-fatal conditions: a file that
//! vanished, a payload that failed its size check, a storage read that did
//! not complete.
//!
//! ## Philosophy
//!
//! - **Structured, not stdout**: a notice is a typed record with a title, a
//!   message, and the context it applies to, never a print statement.
//! - **Non-fatal by definition**: raising a notice never aborts navigation;
//!   the caller decides what safe state to render next.
//! - **Testable**: the board keeps a bounded history tests can inspect.

use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Maximum number of notices kept in history.
pub const MAX_NOTICE_HISTORY: usize = 64;

/// Unique identifier for a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoticeId(Uuid);

impl NoticeId {
    /// Creates a new notice ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NoticeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notice:{}", self.0)
    }
}

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NoticeLevel {
    /// Informational
    Info,
    /// Something was skipped or degraded
    Warning,
    /// An operation failed
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeLevel::Info => write!(f, "INFO"),
            NoticeLevel::Warning => write!(f, "WARNING"),
            NoticeLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// A user-visible notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Unique identifier
    pub id: NoticeId,
    /// Severity
    pub level: NoticeLevel,
    /// Short title shown as the dialog heading
    pub title: String,
    /// Human-readable description
    pub message: String,
    /// The file or container the notice is about, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Notice {
    /// Creates a notice.
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: NoticeId::new(),
            level,
            title: title.into(),
            message: message.into(),
            context: None,
        }
    }

    /// Attaches the file or container the notice is about.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// A "not found" notice for a vanished or empty target.
    pub fn not_found(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, "Not Found", message).with_context(context)
    }

    /// An "unsupported file" notice for a target that failed validation.
    pub fn unsupported(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(
            NoticeLevel::Warning,
            "Unsupported",
            "File cannot be opened or run",
        )
        .with_context(name)
    }

    /// A storage failure notice.
    pub fn read_failed(context: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, "Read Failed", "Failed to read storage")
            .with_context(context)
    }
}

/// Sink for notices.
///
/// Containers raise notices through this trait; the production
/// implementation forwards them to the host dialog, tests use
/// [`NoticeBoard`] directly.
pub trait Notifier {
    /// Raises a notice.
    fn notify(&mut self, notice: Notice);
}

/// A [`Notifier`] with a bounded in-memory history.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    history: VecDeque<Notice>,
}

impl NoticeBoard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent `count` notices, newest first.
    pub fn recent(&self, count: usize) -> Vec<&Notice> {
        self.history.iter().rev().take(count).collect()
    }

    /// The most recent notice, if any.
    pub fn last(&self) -> Option<&Notice> {
        self.history.back()
    }

    /// Total notices currently held.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// True if no notice has been raised.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Clears the history.
    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Notifier for NoticeBoard {
    fn notify(&mut self, notice: Notice) {
        if self.history.len() == MAX_NOTICE_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_constructors() {
        let notice = Notice::not_found("No programs in image", "/tape.t64");
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.title, "Not Found");
        assert_eq!(notice.context.as_deref(), Some("/tape.t64"));

        let notice = Notice::read_failed("/tape.t64");
        assert_eq!(notice.level, NoticeLevel::Error);

        let notice = Notice::unsupported("GAME");
        assert_eq!(notice.title, "Unsupported");
        assert_eq!(notice.context.as_deref(), Some("GAME"));
    }

    #[test]
    fn test_board_records_in_order() {
        let mut board = NoticeBoard::new();
        board.notify(Notice::new(NoticeLevel::Info, "First", "a"));
        board.notify(Notice::new(NoticeLevel::Info, "Second", "b"));

        assert_eq!(board.len(), 2);
        assert_eq!(board.last().unwrap().title, "Second");
        let recent = board.recent(2);
        assert_eq!(recent[0].title, "Second");
        assert_eq!(recent[1].title, "First");
    }

    #[test]
    fn test_history_is_bounded() {
        let mut board = NoticeBoard::new();
        for i in 0..(MAX_NOTICE_HISTORY + 10) {
            board.notify(Notice::new(NoticeLevel::Info, format!("n{i}"), ""));
        }
        assert_eq!(board.len(), MAX_NOTICE_HISTORY);
        assert_eq!(board.history.front().unwrap().title, "n10");
    }

    #[test]
    fn test_notice_serde_round_trip() {
        let notice = Notice::unsupported("GAME");
        let json = serde_json::to_string(&notice).unwrap();
        let back: Notice = serde_json::from_str(&json).unwrap();
        assert_eq!(back, notice);
    }

    #[test]
    fn test_level_ordering() {
        assert!(NoticeLevel::Info < NoticeLevel::Warning);
        assert!(NoticeLevel::Warning < NoticeLevel::Error);
    }
}
