//! Weather service for Nimbus
//!
//! Fetches current conditions and forecasts from OpenWeatherMap, searches
//! cities through API Ninjas, and caches the latest results in the shared
//! key-value store.

pub mod types;
pub mod cache;
pub mod format;
pub mod geocode;
pub mod location;
pub mod provider;
pub mod retry;

pub use types::*;
pub use cache::{CachedSnapshot, ForecastSlot, WeatherCache};
pub use geocode::CitySearch;
pub use location::{ForecastQuery, GeolocationTracker, PositionOutcome};
pub use provider::WeatherProvider;
pub use retry::RetryConfig;
