//! # Event Log
//!
//! Structured logging for the menu core.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not printf-style: an entry carries a
//! level, the component that produced it, a message, and typed key/value
//! fields. The log is an in-memory ring buffer; nothing in the core writes
//! to a console.

use std::collections::VecDeque;

/// Maximum number of entries kept in the ring buffer.
pub const MAX_LOG_HISTORY: usize = 256;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

/// A structured log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Component that produced the entry ("driver", "archive", "root", ...)
    pub component: &'static str,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, component: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            component,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }
}

/// Bounded in-memory log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry, evicting the oldest once the buffer is full.
    pub fn record(&mut self, entry: LogEntry) {
        if self.entries.len() == MAX_LOG_HISTORY {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Records an info entry.
    pub fn info(&mut self, component: &'static str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Info, component, message));
    }

    /// Records a warning entry.
    pub fn warn(&mut self, component: &'static str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Warn, component, message));
    }

    /// Records an error entry.
    pub fn error(&mut self, component: &'static str, message: impl Into<String>) {
        self.record(LogEntry::new(LogLevel::Error, component, message));
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_entry_with_fields() {
        let entry = LogEntry::new(LogLevel::Info, "archive", "page rendered")
            .with_field("page", "2")
            .with_field("rows", "23");
        assert_eq!(entry.fields.len(), 2);
        assert_eq!(entry.fields[0].0, "page");
        assert_eq!(entry.fields[1].1, "23");
    }

    #[test]
    fn test_log_records_in_order() {
        let mut log = EventLog::new();
        log.info("driver", "first");
        log.warn("driver", "second");

        let entries: Vec<_> = log.entries().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[1].level, LogLevel::Warn);
    }

    #[test]
    fn test_ring_buffer_eviction() {
        let mut log = EventLog::new();
        for i in 0..(MAX_LOG_HISTORY + 5) {
            log.info("driver", format!("entry {i}"));
        }
        assert_eq!(log.len(), MAX_LOG_HISTORY);
        assert_eq!(log.entries().next().unwrap().message, "entry 5");
    }
}
