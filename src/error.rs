//! Custom error types for threadline
//!
//! User-friendly error messages for all failure scenarios.

use thiserror::Error;

use crate::core::post::DayOfWeek;

/// Main error type for the threadline application
#[derive(Error, Debug)]
pub enum ThreadlineError {
    /// Malformed timestamp, date, time or out-of-range index
    #[error("{0}")]
    InvalidInput(String),

    /// Thread reply index does not exist
    #[error("Thread reply #{index} does not exist (the thread has {len} replies).\n\n  → Run 'tl thread show' to list replies.")]
    ReplyNotFound { index: usize, len: usize },

    /// Post not present on the board
    #[error("Post '{0}' is not on the board.\n\n  → Run 'tl board show' to list scheduled posts.")]
    PostNotFound(String),

    /// Post index not present in a column
    #[error("No post at position {index} in the {day} column.")]
    PostIndexOutOfRange { day: DayOfWeek, index: usize },

    /// Post content is empty or too long
    #[error("Post content is {len} characters, the limit is {max}.\n\n  → Shorten the text or raise the limit with 'tl config set max-chars N'.")]
    ContentTooLong { len: usize, max: usize },

    /// Wizard step cannot be completed yet
    #[error("Cannot continue: {0}")]
    IncompleteStep(String),

    /// Account handle not configured
    #[error("Account '{0}' is not configured.\n\n  → Run 'tl account list' to see available accounts.")]
    AccountNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Failed to parse thread file: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization/deserialization error
    #[error("Configuration file is invalid: {0}")]
    Toml(String),

    /// Terminal/TUI error
    #[error("Terminal error: {0}\n\n  → Try resizing your terminal or restarting it.")]
    Terminal(String),
}

impl From<toml::de::Error> for ThreadlineError {
    fn from(err: toml::de::Error) -> Self {
        ThreadlineError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for ThreadlineError {
    fn from(err: toml::ser::Error) -> Self {
        ThreadlineError::Toml(err.to_string())
    }
}

/// Result type alias using ThreadlineError
pub type Result<T> = std::result::Result<T, ThreadlineError>;
