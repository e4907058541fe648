//! Store error types.

use thiserror::Error;

/// Errors raised by the key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A mutating call was given an undefined key or value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The underlying storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A persisted entry could not be decoded.
    #[error("Corrupt entry for key {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

impl StoreError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "Database key and value must be declared",
            Self::Storage(_) => "Unable to access local data. Try restarting the app.",
            Self::Corrupt { .. } => "Local data may be corrupted. Consider resetting app data.",
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("corrupt") => {
                Self::corrupt("<database>", e.to_string())
            }
            _ => Self::storage(e.to_string()),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
