//! Resolving which location to fetch weather for.

use std::fmt;
use std::sync::Arc;

use nimbus_store::keys::{USER_DEFAULT_LOCATION, USER_LATITUDE, USER_LONGITUDE};
use nimbus_store::{KvStore, WriteBatch};

use crate::types::{Coordinates, WeatherError};

/// What a weather request is keyed by
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastQuery {
    City(String),
    Coordinates(Coordinates),
}

impl ForecastQuery {
    /// The saved city wins; otherwise both saved coordinates are required.
    pub fn resolve(store: &KvStore) -> Result<Self, WeatherError> {
        if let Some(city) = store.get(USER_DEFAULT_LOCATION)? {
            if !city.trim().is_empty() {
                return Ok(Self::City(city));
            }
        }

        let latitude = store.get_value(USER_LATITUDE)?.and_then(|v| v.as_number());
        let longitude = store.get_value(USER_LONGITUDE)?.and_then(|v| v.as_number());

        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Ok(Self::Coordinates(Coordinates::new(lat, lon)?)),
            _ => {
                tracing::debug!("No city or coordinates saved");
                Err(WeatherError::NoSavedLocation)
            }
        }
    }
}

impl fmt::Display for ForecastQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::City(city) => f.write_str(city),
            Self::Coordinates(c) => write!(f, "{}, {}", c.latitude, c.longitude),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionOutcome {
    /// First fix: coordinates were saved, nothing to fetch yet
    Stored(Coordinates),
    /// Coordinates already known: fetch weather for the fresh fix
    Fetch(Coordinates),
}

/// Captures the device position once and hands later fixes to the fetcher.
#[derive(Debug, Clone)]
pub struct GeolocationTracker {
    store: Arc<KvStore>,
}

impl GeolocationTracker {
    pub fn new(store: Arc<KvStore>) -> Self {
        Self { store }
    }

    pub fn on_position(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<PositionOutcome, WeatherError> {
        let coords = Coordinates::new(latitude, longitude)?;

        let known = self.store.contains(USER_LATITUDE)? || self.store.contains(USER_LONGITUDE)?;
        if known {
            return Ok(PositionOutcome::Fetch(coords));
        }

        self.store.write_batch(
            WriteBatch::new()
                .put(USER_LATITUDE, coords.latitude)
                .put(USER_LONGITUDE, coords.longitude),
        )?;
        tracing::info!("Saved position {}, {}", coords.latitude, coords.longitude);
        Ok(PositionOutcome::Stored(coords))
    }

    /// Saved coordinates, if both are present
    pub fn saved(&self) -> Result<Option<Coordinates>, WeatherError> {
        let latitude = self.store.get_value(USER_LATITUDE)?.and_then(|v| v.as_number());
        let longitude = self.store.get_value(USER_LONGITUDE)?.and_then(|v| v.as_number());

        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Ok(Some(Coordinates::new(lat, lon)?)),
            _ => Ok(None),
        }
    }
}
