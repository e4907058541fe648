//! Settings service: typed preferences on top of the key-value store.
//!
//! State is re-derived from the store on every call. Nothing is cached here,
//! so changes made through another handle on the same store are visible
//! immediately.

use std::sync::Arc;

use nimbus_store::{keys, KvStore, StoreValue, WriteBatch};
use serde::Serialize;

use crate::error::{SettingsError, SettingsResult};
use crate::units::{ApiUnits, UnitCode};

/// Display name written when the unit preference is first read.
pub const DEFAULT_UNIT_NAME: &str = "celsius";

pub const TRACKING_OFF_HINT: &str = "Changes settings to track default location";

/// Navigation target handed back to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Application root; the landing page is re-decided from there.
    Root,
    /// Onboarding page.
    Home,
    /// Main weather page.
    Weather,
}

/// Whether the one-time onboarding has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingState {
    NotSeen,
    Seen,
}

/// Which storage path a setting change took.
///
/// Storage behavior is identical either way; only the message differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingOutcome {
    Created,
    Updated,
}

/// Point-in-time view of the derived settings.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsSnapshot {
    pub onboarding: OnboardingState,
    pub default_location: Option<String>,
    pub tracking_enabled: bool,
    pub unit_code: UnitCode,
    pub api_units: ApiUnits,
}

/// Typed access to user preferences.
#[derive(Debug, Clone)]
pub struct SettingsService {
    store: Arc<KvStore>,
}

impl SettingsService {
    pub fn new(store: Arc<KvStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<KvStore> {
        &self.store
    }

    /// Raw `WEATHER_UNIT` value, without any defaulting.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn stored_unit(&self) -> SettingsResult<Option<String>> {
        Ok(self.store.get(keys::WEATHER_UNIT)?)
    }

    /// Write the default unit name if no unit is stored yet.
    ///
    /// Returns `true` when the default was written.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn ensure_unit_initialized(&self) -> SettingsResult<bool> {
        if self.store.contains(keys::WEATHER_UNIT)? {
            return Ok(false);
        }
        self.store.create(keys::WEATHER_UNIT, DEFAULT_UNIT_NAME)?;
        tracing::info!("Initialized weather unit to {}", DEFAULT_UNIT_NAME);
        Ok(true)
    }

    /// Read the unit code, materializing `celsius` when no unit is stored.
    ///
    /// This is a read with a write side effect on first use. No other
    /// setting is defaulted this way.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn get_or_init_unit_code(&self) -> SettingsResult<UnitCode> {
        match self.stored_unit()? {
            Some(raw) => Ok(UnitCode::from_stored(&raw)),
            None => {
                self.ensure_unit_initialized()?;
                Ok(UnitCode::Celsius)
            }
        }
    }

    /// Unit system to request from the weather API. Metric when unset.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn api_units(&self) -> SettingsResult<ApiUnits> {
        Ok(self
            .stored_unit()?
            .and_then(|raw| ApiUnits::from_stored(&raw))
            .unwrap_or_default())
    }

    /// Apply a unit selector from the settings form.
    ///
    /// # Errors
    /// Returns `SettingsError::Validation` for anything but `"0"`, `"1"` or
    /// `"2"`; the stored unit is left untouched in that case.
    pub fn set_unit(&self, selection: &str) -> SettingsResult<ApiUnits> {
        let units = ApiUnits::from_selection(selection)
            .ok_or_else(|| SettingsError::validation("Select a valid unit"))?;

        let outcome = self.upsert(keys::WEATHER_UNIT, units.as_stored())?;
        match outcome {
            SettingOutcome::Created => tracing::info!("Weather unit stored: {}", units.as_stored()),
            SettingOutcome::Updated => {
                tracing::info!("Weather unit updated: {}", units.as_stored())
            }
        }
        Ok(units)
    }

    /// Save the default location after trimming it.
    ///
    /// # Errors
    /// Returns `SettingsError::Validation` if the trimmed input is empty.
    pub fn set_default_location(&self, raw: &str) -> SettingsResult<()> {
        let location = validate_location(raw)?;
        self.store.update(keys::USER_DEFAULT_LOCATION, location)?;
        tracing::info!("Default location updated: {}", location);
        Ok(())
    }

    /// # Errors
    /// Returns an error if the store fails.
    pub fn default_location(&self) -> SettingsResult<Option<String>> {
        Ok(self.store.get(keys::USER_DEFAULT_LOCATION)?)
    }

    /// Turn tracking of the saved location on or off.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn set_tracking_enabled(&self, enabled: bool) -> SettingsResult<SettingOutcome> {
        let outcome = self.upsert(keys::TRACK_SAVED_LOCATION_WEATHER, enabled)?;
        tracing::info!("Saved location tracking set to {}", enabled);
        Ok(outcome)
    }

    /// True only when the stored value is the boolean `true`.
    ///
    /// The text `"true"` does not count.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn is_tracking_enabled(&self) -> SettingsResult<bool> {
        Ok(matches!(
            self.store.get_value(keys::TRACK_SAVED_LOCATION_WEATHER)?,
            Some(StoreValue::Bool(true))
        ))
    }

    /// Notice shown on ad-hoc searches while tracking is explicitly off.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn tracking_hint(&self) -> SettingsResult<Option<&'static str>> {
        let off = matches!(
            self.store.get_value(keys::TRACK_SAVED_LOCATION_WEATHER)?,
            Some(StoreValue::Bool(false))
        );
        Ok(off.then_some(TRACKING_OFF_HINT))
    }

    /// # Errors
    /// Returns an error if the store fails.
    pub fn onboarding_state(&self) -> SettingsResult<OnboardingState> {
        let seen = self
            .store
            .get_value(keys::HOME_PAGE_SEEN)?
            .is_some_and(|v| v.is_truthy());
        Ok(if seen {
            OnboardingState::Seen
        } else {
            OnboardingState::NotSeen
        })
    }

    /// Page to open at the application root.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn landing_page(&self) -> SettingsResult<Route> {
        Ok(match self.onboarding_state()? {
            OnboardingState::Seen => Route::Weather,
            OnboardingState::NotSeen => Route::Home,
        })
    }

    /// Weather pages are only reachable after onboarding.
    ///
    /// # Errors
    /// Returns `SettingsError::Validation` while onboarding is not completed.
    pub fn require_onboarded(&self) -> SettingsResult<()> {
        match self.onboarding_state()? {
            OnboardingState::Seen => Ok(()),
            OnboardingState::NotSeen => Err(SettingsError::validation(
                "Finish onboarding first: run `nimbus onboard <location>`",
            )),
        }
    }

    /// Complete onboarding with the user's default location.
    ///
    /// Writes the onboarding flag, the location, tracking off and the
    /// `metric` unit in one batch.
    ///
    /// Onboarding happens once per namespace. Only `reset_all` allows it
    /// again, so saved tracking and unit choices are never overwritten here.
    ///
    /// # Errors
    /// Returns `SettingsError::Validation` if the trimmed location is empty or
    /// onboarding was already completed.
    pub fn bootstrap_onboarding(&self, location: &str) -> SettingsResult<()> {
        let location = validate_location(location)?;
        if self.onboarding_state()? == OnboardingState::Seen {
            return Err(SettingsError::validation(
                "Onboarding already completed. Use `location set` to change the default location.",
            ));
        }

        self.store.write_batch(
            WriteBatch::new()
                .put(keys::HOME_PAGE_SEEN, true)
                .put(keys::USER_DEFAULT_LOCATION, location)
                .put(keys::TRACK_SAVED_LOCATION_WEATHER, false)
                .put(keys::WEATHER_UNIT, ApiUnits::Metric.as_stored()),
        )?;

        tracing::info!("Onboarding completed for {}", location);
        Ok(())
    }

    /// Wipe the whole namespace and ask the caller to go to the root.
    ///
    /// Irreversible. Confirmation is the caller's job.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn reset_all(&self) -> SettingsResult<Route> {
        self.store.destroy()?;
        tracing::warn!("Factory settings restored");
        Ok(Route::Root)
    }

    /// # Errors
    /// Returns an error if the store fails. May initialize the unit.
    pub fn snapshot(&self) -> SettingsResult<SettingsSnapshot> {
        Ok(SettingsSnapshot {
            onboarding: self.onboarding_state()?,
            default_location: self.default_location()?,
            tracking_enabled: self.is_tracking_enabled()?,
            unit_code: self.get_or_init_unit_code()?,
            api_units: self.api_units()?,
        })
    }

    fn upsert<V: nimbus_store::IntoStoreValue>(
        &self,
        key: &str,
        value: V,
    ) -> SettingsResult<SettingOutcome> {
        let outcome = if self.store.contains(key)? {
            SettingOutcome::Updated
        } else {
            SettingOutcome::Created
        };
        self.store.update(key, value)?;
        Ok(outcome)
    }
}

fn validate_location(raw: &str) -> SettingsResult<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SettingsError::validation("Please enter a valid location"));
    }
    Ok(trimmed)
}
