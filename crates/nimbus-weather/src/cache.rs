//! Last-fetched weather, cached in the shared key-value store.
//!
//! Entries are stale-until-overwritten; reads fall back to fixed display
//! defaults when nothing has been fetched yet.

use std::sync::Arc;

use nimbus_services::ApiUnits;
use nimbus_store::keys::{
    ForecastField, FORECAST_SLOTS, SUB_WEATHER_HUMIDITY_VALUE, SUB_WEATHER_PRESSURE_VALUE,
    SUB_WEATHER_WIND_VALUE, WEATHER_CODE, WEATHER_DEG, WEATHER_DESCRIPTION, WEATHER_LOCATION,
};
use nimbus_store::{KvStore, WriteBatch};
use serde::Serialize;

use crate::types::{
    CurrentResponse, ForecastEntry, ForecastResponse, WeatherCondition, WeatherError,
};

const FALLBACK_LOCATION: &str = "Lagos 9ja";
const FALLBACK_DEGREES: f64 = 30.0;
const FALLBACK_DESCRIPTION: &str = "clear sky";
const FALLBACK_CODE: i64 = 800;
const FALLBACK_WIND: &str = "2.90 m/s";
const FALLBACK_HUMIDITY: &str = "98%";
const FALLBACK_PRESSURE: &str = "1000 hPa";

const FALLBACK_SLOT_TIME: &str = "12pm";
const FALLBACK_SLOT_ICON: &str = "800";
const FALLBACK_SLOT_UNIT: &str = "26";

/// Current conditions as shown on the main page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedSnapshot {
    pub location: String,
    pub degrees: f64,
    pub description: String,
    pub code: i64,
    pub wind: String,
    pub humidity: String,
    pub pressure: String,
}

impl CachedSnapshot {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_owm_code(self.code)
    }
}

/// One cached three-hour forecast bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSlot {
    pub time: String,
    pub icon: String,
    pub temperature: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WeatherCache {
    store: Arc<KvStore>,
}

impl WeatherCache {
    pub fn new(store: Arc<KvStore>) -> Self {
        Self { store }
    }

    /// Write the current-conditions snapshot in one batch.
    pub fn store_current(
        &self,
        response: &CurrentResponse,
        units: ApiUnits,
    ) -> Result<(), WeatherError> {
        let condition = response
            .primary_condition()
            .ok_or_else(|| WeatherError::Parse("response has no weather conditions".to_string()))?;

        let batch = WriteBatch::new()
            .put(WEATHER_LOCATION, response.location_label())
            .put(WEATHER_DEG, response.main.temp)
            .put(WEATHER_DESCRIPTION, condition.description.as_str())
            .put(WEATHER_CODE, condition.id)
            .put(
                SUB_WEATHER_WIND_VALUE,
                format!("{} {}", response.wind.speed, units.wind_speed_unit()),
            )
            .put(SUB_WEATHER_HUMIDITY_VALUE, format!("{} %", response.main.humidity))
            .put(SUB_WEATHER_PRESSURE_VALUE, format!("{} hPa", response.main.pressure));

        self.store.write_batch(batch)?;
        tracing::debug!("Cached current weather for {}", response.location_label());
        Ok(())
    }

    /// Write the first day's slots. Unusable entries are skipped and leave
    /// their slot untouched. Returns the number of slots written.
    pub fn store_first_day(&self, forecast: &ForecastResponse) -> Result<usize, WeatherError> {
        let mut batch = WriteBatch::new();
        let mut written = 0;

        for (slot, item) in forecast.day(0).iter().enumerate() {
            let Some(entry) = ForecastEntry::from_item(item) else {
                tracing::debug!("Skipping forecast slot {}", slot);
                continue;
            };

            batch = batch
                .put(&ForecastField::Time.key(slot), entry.time)
                .put(&ForecastField::Icon.key(slot), entry.code.to_string())
                .put(&ForecastField::Unit.key(slot), entry.temperature)
                .put(&ForecastField::Title.key(slot), entry.description);
            written += 1;
        }

        if !batch.is_empty() {
            self.store.write_batch(batch)?;
        }
        tracing::debug!("Cached {} forecast slots", written);
        Ok(written)
    }

    pub fn snapshot(&self) -> Result<CachedSnapshot, WeatherError> {
        Ok(CachedSnapshot {
            location: self.text_or(WEATHER_LOCATION, FALLBACK_LOCATION)?,
            degrees: self.number(WEATHER_DEG)?.unwrap_or(FALLBACK_DEGREES),
            description: self.text_or(WEATHER_DESCRIPTION, FALLBACK_DESCRIPTION)?,
            code: self
                .number(WEATHER_CODE)?
                .map(|c| c as i64)
                .unwrap_or(FALLBACK_CODE),
            wind: self.text_or(SUB_WEATHER_WIND_VALUE, FALLBACK_WIND)?,
            humidity: self.text_or(SUB_WEATHER_HUMIDITY_VALUE, FALLBACK_HUMIDITY)?,
            pressure: self.text_or(SUB_WEATHER_PRESSURE_VALUE, FALLBACK_PRESSURE)?,
        })
    }

    pub fn forecast_slots(&self) -> Result<Vec<ForecastSlot>, WeatherError> {
        (0..FORECAST_SLOTS)
            .map(|slot| {
                Ok(ForecastSlot {
                    time: self.text_or(&ForecastField::Time.key(slot), FALLBACK_SLOT_TIME)?,
                    icon: self.text_or(&ForecastField::Icon.key(slot), FALLBACK_SLOT_ICON)?,
                    temperature: self.text_or(&ForecastField::Unit.key(slot), FALLBACK_SLOT_UNIT)?,
                    title: self.text(&ForecastField::Title.key(slot))?,
                })
            })
            .collect()
    }

    /// Blank text counts as missing
    fn text(&self, key: &str) -> Result<Option<String>, WeatherError> {
        Ok(self.store.get(key)?.filter(|v| !v.trim().is_empty()))
    }

    fn text_or(&self, key: &str, fallback: &str) -> Result<String, WeatherError> {
        Ok(self.text(key)?.unwrap_or_else(|| fallback.to_string()))
    }

    fn number(&self, key: &str) -> Result<Option<f64>, WeatherError> {
        Ok(self.store.get_value(key)?.and_then(|v| v.as_number()))
    }
}
