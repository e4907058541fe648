use std::sync::Arc;
use std::time::Duration;

use nimbus_services::{SettingsError, SettingsService};
use nimbus_store::KvStore;
use nimbus_weather::{
    CachedSnapshot, CitySearch, ForecastEntry, ForecastQuery, GeolocationTracker, PositionOutcome,
    RetryConfig, WeatherCache, WeatherProvider,
};

use crate::error::{AppError, ConfigError};
use crate::Config;

/// Application context: one store shared by every service.
pub struct App {
    config: Arc<Config>,
    store: Arc<KvStore>,
    settings: SettingsService,
    weather: WeatherProvider,
    cities: CitySearch,
    cache: WeatherCache,
    tracker: GeolocationTracker,
}

impl App {
    /// Open the SQLite store at `config.storage.path` and wire the services.
    pub fn new(config: Config) -> Result<Self, AppError> {
        if let Some(parent) = config.storage.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = KvStore::open(&config.storage.path)?;
        tracing::info!("Opened store at {}", config.storage.path.display());
        Self::with_store(config, store)
    }

    /// Same wiring over a throwaway in-memory store
    pub fn in_memory(config: Config) -> Result<Self, AppError> {
        Self::with_store(config, KvStore::in_memory())
    }

    fn with_store(config: Config, store: KvStore) -> Result<Self, AppError> {
        let store = Arc::new(store);
        let timeout = Duration::from_secs(config.weather.timeout_secs);
        let retry = RetryConfig {
            max_retries: config.weather.max_retries,
            ..RetryConfig::default()
        };

        let weather = WeatherProvider::with_base_url(
            &config.weather.effective_api_key().unwrap_or_default(),
            &config.weather.base_url,
            timeout,
        )?
        .with_retry(retry);

        let cities = CitySearch::with_base_url(
            &config.cities.effective_api_key().unwrap_or_default(),
            &config.cities.base_url,
            timeout,
        )?;

        Ok(Self {
            config: Arc::new(config),
            settings: SettingsService::new(store.clone()),
            cache: WeatherCache::new(store.clone()),
            tracker: GeolocationTracker::new(store.clone()),
            store,
            weather,
            cities,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<KvStore> {
        &self.store
    }

    pub fn settings(&self) -> &SettingsService {
        &self.settings
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    pub fn tracker(&self) -> &GeolocationTracker {
        &self.tracker
    }

    /// The weather client, if an API key is configured
    pub fn weather(&self) -> Result<&WeatherProvider, AppError> {
        if self.config.weather.effective_api_key().is_none() {
            return Err(ConfigError::MissingSetting("weather.api_key".to_string()).into());
        }
        Ok(&self.weather)
    }

    /// The city search client, if an API key is configured
    pub fn cities(&self) -> Result<&CitySearch, AppError> {
        if self.config.cities.effective_api_key().is_none() {
            return Err(ConfigError::MissingSetting("cities.api_key".to_string()).into());
        }
        Ok(&self.cities)
    }

    /// Fetch current conditions for the saved location and cache them
    pub async fn refresh_saved(&self) -> Result<CachedSnapshot, AppError> {
        let query = ForecastQuery::resolve(&self.store)?;
        self.fetch_current(&query).await
    }

    /// Fetch current conditions for an ad-hoc city without saving it
    pub async fn refresh_city(&self, city: &str) -> Result<CachedSnapshot, AppError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(SettingsError::validation("Please enter a valid location").into());
        }
        self.fetch_current(&ForecastQuery::City(city.to_string())).await
    }

    /// Fetch the forecast for the saved location, cache the first day and
    /// return the entries of every day
    pub async fn refresh_forecast(&self) -> Result<Vec<Vec<ForecastEntry>>, AppError> {
        let query = ForecastQuery::resolve(&self.store)?;
        let units = self.settings.api_units()?;

        let forecast = self.weather()?.forecast(&query, units).await?;
        self.cache.store_first_day(&forecast)?;

        Ok(forecast.days())
    }

    /// Handle a position fix. The first fix is only saved; later fixes
    /// fetch weather for the fresh coordinates.
    pub async fn on_position(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<CachedSnapshot>, AppError> {
        match self.tracker.on_position(latitude, longitude)? {
            PositionOutcome::Stored(_) => Ok(None),
            PositionOutcome::Fetch(coords) => self
                .fetch_current(&ForecastQuery::Coordinates(coords))
                .await
                .map(Some),
        }
    }

    async fn fetch_current(&self, query: &ForecastQuery) -> Result<CachedSnapshot, AppError> {
        let units = self.settings.api_units()?;

        let current = self.weather()?.current(query, units).await?;
        self.cache.store_current(&current, units)?;

        Ok(self.cache.snapshot()?)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use nimbus_services::Route;

    fn config_with_keys() -> Config {
        let mut config = Config::default();
        config.weather.api_key = Some("owm".to_string());
        config.cities.api_key = Some("ninjas".to_string());
        config
    }

    #[test]
    fn test_services_share_one_store() {
        let app = App::in_memory(config_with_keys()).unwrap();
        app.settings().bootstrap_onboarding("Accra").unwrap();

        assert_eq!(app.store().count_items().unwrap(), 4);
        assert_eq!(app.settings().landing_page().unwrap(), Route::Weather);
    }

    #[test]
    fn test_new_opens_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_with_keys();
        config.storage.path = dir.path().join("data").join("nimbus.db");

        {
            let app = App::new(config.clone()).unwrap();
            app.settings().set_default_location("Kumasi").unwrap();
        }

        let app = App::new(config).unwrap();
        assert_eq!(
            app.settings().default_location().unwrap().as_deref(),
            Some("Kumasi")
        );
    }

    #[tokio::test]
    async fn test_refresh_city_rejects_blank() {
        let app = App::in_memory(config_with_keys()).unwrap();
        let err = app.refresh_city("   ").await.err().unwrap();
        assert_eq!(err.user_message(), "Please enter a valid location");
    }

    #[tokio::test]
    async fn test_refresh_without_location() {
        let app = App::in_memory(config_with_keys()).unwrap();
        let err = app.refresh_saved().await.err().unwrap();
        assert_eq!(err.user_message(), "No saved location found!");
    }
}
