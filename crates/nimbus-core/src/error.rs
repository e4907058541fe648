//! Centralized error types for the Nimbus application.
//!
//! Each crate keeps its own `thiserror` enum; `AppError` gathers them so the
//! binary has one type to report, and `user_message()` gives text suitable
//! for showing to the user.

use nimbus_services::SettingsError;
use nimbus_store::StoreError;
use nimbus_weather::WeatherError;
use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Store(e) => e.user_message().to_string(),
            AppError::Settings(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Io(_) => "A file operation failed. Please try again.".to_string(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }

    /// Validation failures the user can fix by retrying with other input
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Settings(e) => e.is_recoverable(),
            AppError::Weather(
                WeatherError::NoSavedLocation | WeatherError::LocationNotFound(_),
            ) => true,
            _ => false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
        }
    }
}
