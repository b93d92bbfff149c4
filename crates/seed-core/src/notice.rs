//! Transient user notifications
//!
//! Bounded buffer of short messages a front end shows once and discards.

use parking_lot::Mutex;
use std::collections::VecDeque;

/// Message shown when a store write fails
pub const SERVER_ERROR_MESSAGE: &str = "Server error occurred";

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
}

/// One transient notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text shown to the user
    pub message: String,
}

impl Notice {
    /// Success notice
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Error notice
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Bounded notification buffer; the oldest entry is dropped when full
#[derive(Debug)]
pub struct Notices {
    limit: usize,
    entries: Mutex<VecDeque<Notice>>,
}

impl Notices {
    /// Create buffer holding at most `limit` notices
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Append a notice
    pub fn push(&self, notice: Notice) {
        let mut entries = self.entries.lock();
        if entries.len() == self.limit {
            entries.pop_front();
        }
        entries.push_back(notice);
    }

    /// Pending notices, oldest first
    #[must_use]
    pub fn pending(&self) -> Vec<Notice> {
        self.entries.lock().iter().cloned().collect()
    }

    /// Take every pending notice
    pub fn drain(&self) -> Vec<Notice> {
        self.entries.lock().drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_notice_is_dropped() {
        let notices = Notices::new(2);
        notices.push(Notice::success("one"));
        notices.push(Notice::success("two"));
        notices.push(Notice::error(SERVER_ERROR_MESSAGE));

        let pending = notices.pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].message, "two");
        assert_eq!(pending[1].level, NoticeLevel::Error);
    }

    #[test]
    fn drain_empties_buffer() {
        let notices = Notices::new(4);
        notices.push(Notice::success("saved"));
        assert_eq!(notices.drain().len(), 1);
        assert!(notices.pending().is_empty());
    }
}
