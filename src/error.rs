// Error types for the lemon application.
// Covers the menu store, the remote feed, local preferences, and form validation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LemonError {
    #[error("Menu store unavailable: {0}")]
    Schema(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Menu feed returned HTTP {status}")]
    FeedStatus { status: u16 },

    #[error("Malformed menu feed: {0}")]
    DataFormat(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Other(String),
}

impl LemonError {
    /// Whether the app can keep going after this error.
    /// Only a store that cannot be opened at all stops the menu screen for good.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LemonError::Schema(_))
    }

    /// Whether the remote feed could not be reached.
    pub fn is_network(&self) -> bool {
        matches!(self, LemonError::Network(_) | LemonError::FeedStatus { .. })
    }
}

pub type Result<T> = std::result::Result<T, LemonError>;
