//! Application settings derived from the key-value store.

pub mod error;
pub mod settings;
pub mod units;

pub use error::{SettingsError, SettingsResult};
pub use settings::{OnboardingState, Route, SettingOutcome, SettingsService, SettingsSnapshot};
pub use units::{ApiUnits, UnitCode};
