//! Settings error types.

use nimbus_store::StoreError;
use thiserror::Error;

/// Errors that can occur while changing settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// User input failed a semantic check. The caller should re-prompt.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The store rejected the call or failed. Not caught here.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SettingsError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the caller can recover by asking the user again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// User-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Store(e) => e.user_message().to_string(),
        }
    }
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
