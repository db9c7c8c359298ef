// User-facing notices.
// Every failure in the menu pipeline ends up here and is shown in the status line.

use chrono::{DateTime, Utc};

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// A message for the status line.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Whether the notice is older than `seconds`.
    pub fn is_older_than(&self, seconds: i64) -> bool {
        Utc::now().signed_duration_since(self.timestamp).num_seconds() >= seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_age() {
        let mut notice = Notice::error("Menu feed returned HTTP 503");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(!notice.is_older_than(10));

        notice.timestamp = Utc::now() - chrono::Duration::seconds(30);
        assert!(notice.is_older_than(10));
    }
}
