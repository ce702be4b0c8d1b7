//! Error types for upskill.
//!
//! Library crates use [`UpskillError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all upskill operations.
#[derive(Debug, thiserror::Error)]
pub enum UpskillError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching a document.
    #[error("network error: {0}")]
    Network(String),

    /// The site served an anti-scraping challenge instead of the posting.
    #[error("bot protection blocked {url}")]
    BotBlock { url: String },

    /// Record store request failed or returned something unreadable.
    #[error("store error: {0}")]
    Store(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad URL, bad selector, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, UpskillError>;

impl UpskillError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a bot-block error for the given URL.
    pub fn bot_block(url: impl Into<String>) -> Self {
        Self::BotBlock { url: url.into() }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is a bot-protection block (user-actionable).
    pub fn is_bot_block(&self) -> bool {
        matches!(self, Self::BotBlock { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = UpskillError::config("missing NOTION_TOKEN");
        assert_eq!(err.to_string(), "config error: missing NOTION_TOKEN");

        let err = UpskillError::bot_block("https://jobs.example.com/1");
        assert_eq!(
            err.to_string(),
            "bot protection blocked https://jobs.example.com/1"
        );
    }

    #[test]
    fn bot_block_is_distinct() {
        assert!(UpskillError::bot_block("https://a.example").is_bot_block());
        assert!(!UpskillError::Network("timeout".into()).is_bot_block());
        assert!(!UpskillError::Store("bad json".into()).is_bot_block());
    }
}
