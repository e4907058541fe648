use nimbus_store::StoreError;
use serde::{Deserialize, Serialize};

use crate::format;

/// Weather condition categories mapped from OpenWeatherMap condition codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Thunderstorm,
    Drizzle,
    Rain,
    FreezingRain,
    Mist,
    Haze,
    #[default]
    Clear,
    FewClouds,
    ScatteredClouds,
    BrokenClouds,
    OvercastClouds,
    Unknown,
}

impl WeatherCondition {
    /// Convert an OpenWeatherMap condition id to a WeatherCondition
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_owm_code(code: i64) -> Self {
        match code {
            200..=299 => Self::Thunderstorm,
            300..=399 => Self::Drizzle,
            511 => Self::FreezingRain,
            500..=599 => Self::Rain,
            701 => Self::Mist,
            700..=799 => Self::Haze,
            800 => Self::Clear,
            801 => Self::FewClouds,
            802 => Self::ScatteredClouds,
            803 => Self::BrokenClouds,
            804 => Self::OvercastClouds,
            _ => Self::Unknown, // Snow (6xx) has no icon either
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Thunderstorm => "Thunderstorm",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::FreezingRain => "Freezing Rain",
            Self::Mist => "Mist",
            Self::Haze => "Haze",
            Self::Clear => "Clear",
            Self::FewClouds => "Few Clouds",
            Self::ScatteredClouds => "Scattered Clouds",
            Self::BrokenClouds => "Broken Clouds",
            Self::OvercastClouds => "Overcast Clouds",
            Self::Unknown => "Unknown",
        }
    }

    /// Icon asset name; empty when there is no icon for the condition
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Thunderstorm => "thunder",
            Self::Drizzle => "rainy-5",
            Self::Rain => "rainy-7",
            Self::FreezingRain => "freezing-rain",
            Self::Mist => "mist",
            Self::Haze => "haze",
            Self::Clear => "day",
            Self::FewClouds => "few-clouds",
            Self::ScatteredClouds => "scattered-clouds",
            Self::BrokenClouds => "broken-clouds",
            Self::OvercastClouds => "overcast-clouds",
            Self::Unknown => "",
        }
    }
}

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(LocationError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// `cod` is a number on the current endpoint and a string on the forecast one
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResponseCode {
    Number(i64),
    Text(String),
}

impl ResponseCode {
    pub fn is_ok(&self) -> bool {
        match self {
            Self::Number(n) => *n == 200,
            Self::Text(s) => s == "200",
        }
    }
}

impl Default for ResponseCode {
    fn default() -> Self {
        Self::Number(200)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionEntry {
    pub id: i64,
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentMain {
    pub temp: f64,
    pub pressure: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub country: String,
}

/// Response of the current weather endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentResponse {
    #[serde(default)]
    pub cod: ResponseCode,
    pub name: String,
    pub weather: Vec<ConditionEntry>,
    pub main: CurrentMain,
    pub wind: Wind,
    #[serde(default)]
    pub sys: Sys,
}

impl CurrentResponse {
    /// "Lagos NG"
    pub fn location_label(&self) -> String {
        format!("{} {}", self.name, self.sys.country)
            .trim()
            .to_string()
    }

    pub fn primary_condition(&self) -> Option<&ConditionEntry> {
        self.weather.first()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastMain {
    #[serde(default)]
    pub temp: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastItem {
    #[serde(default)]
    pub dt: i64,
    #[serde(default)]
    pub main: Option<ForecastMain>,
    #[serde(default)]
    pub weather: Vec<ConditionEntry>,
    #[serde(default)]
    pub dt_txt: String,
}

/// Response of the 5 day / 3 hour forecast endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub cod: ResponseCode,
    #[serde(default)]
    pub list: Vec<ForecastItem>,
}

/// Three-hour entries per forecast day
pub const ENTRIES_PER_DAY: usize = 8;

/// Days shown on the forecast page
pub const FORECAST_DAYS: usize = 5;

impl ForecastResponse {
    /// Raw entries of day `index` (0-based); empty past the end of the list
    pub fn day(&self, index: usize) -> &[ForecastItem] {
        let start = (index * ENTRIES_PER_DAY).min(self.list.len());
        let end = (start + ENTRIES_PER_DAY).min(self.list.len());
        &self.list[start..end]
    }

    /// Number of (possibly partial) days in the list
    pub fn day_count(&self) -> usize {
        self.list.len().div_ceil(ENTRIES_PER_DAY)
    }

    /// Display entries per day, at most [`FORECAST_DAYS`] of them.
    /// Unusable entries are dropped from their day.
    pub fn days(&self) -> Vec<Vec<ForecastEntry>> {
        (0..self.day_count().min(FORECAST_DAYS))
            .map(|index| self.day(index).iter().filter_map(ForecastEntry::from_item).collect())
            .collect()
    }
}

/// Display-ready view of one forecast entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    pub time: String,
    pub code: i64,
    pub condition: WeatherCondition,
    pub temperature: String,
    pub description: String,
}

impl ForecastEntry {
    /// Returns `None` for entries without condition or readings
    pub fn from_item(item: &ForecastItem) -> Option<Self> {
        let main = item.main.as_ref()?;
        let condition = item.weather.first()?;

        let time = format::hour_label(&item.dt_txt).unwrap_or_else(|| "--".to_string());
        let temperature = main
            .temp
            .map(|t| format::round_up(t).to_string())
            .unwrap_or_else(|| "--".to_string());
        let description = if condition.description.is_empty() {
            "No description".to_string()
        } else {
            condition.description.clone()
        };

        Some(Self {
            time,
            code: condition.id,
            condition: WeatherCondition::from_owm_code(condition.id),
            temperature,
            description,
        })
    }
}

/// City returned by the city search API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub population: Option<u64>,
}

/// Location errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Coordinates out of range: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
    #[error("Weather API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Location not found: {0}")]
    LocationNotFound(String),
    #[error("No saved location found!")]
    NoSavedLocation,
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Cache error: {0}")]
    Cache(#[from] StoreError),
}

impl WeatherError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(e) if e.is_timeout() => {
                "The request timed out. Please try again.".to_string()
            }
            Self::Network(_) => "Network Error!".to_string(),
            Self::Location(_) => "Invalid location coordinates.".to_string(),
            Self::Api { message, .. } if !message.is_empty() => message.clone(),
            Self::Api { .. } => "Something went wrong!".to_string(),
            Self::InvalidApiKey => "Weather API key is invalid. Check settings.".to_string(),
            Self::LocationNotFound(_) => "Location not found. Check and try again.".to_string(),
            Self::NoSavedLocation => "No saved location found!".to_string(),
            Self::Parse(_) => "Failed to process weather data.".to_string(),
            Self::InvalidUrl(_) => "Weather service URL is invalid. Check settings.".to_string(),
            Self::Cache(e) => e.user_message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_owm_code_thunderstorm() {
        assert_eq!(WeatherCondition::from_owm_code(200), WeatherCondition::Thunderstorm);
        assert_eq!(WeatherCondition::from_owm_code(232), WeatherCondition::Thunderstorm);
    }

    #[test]
    fn test_owm_code_drizzle() {
        assert_eq!(WeatherCondition::from_owm_code(300), WeatherCondition::Drizzle);
        assert_eq!(WeatherCondition::from_owm_code(321), WeatherCondition::Drizzle);
    }

    #[test]
    fn test_owm_code_rain_and_freezing_rain() {
        assert_eq!(WeatherCondition::from_owm_code(500), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_owm_code(531), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_owm_code(511), WeatherCondition::FreezingRain);
    }

    #[test]
    fn test_owm_code_atmosphere() {
        assert_eq!(WeatherCondition::from_owm_code(701), WeatherCondition::Mist);
        assert_eq!(WeatherCondition::from_owm_code(711), WeatherCondition::Haze);
        assert_eq!(WeatherCondition::from_owm_code(781), WeatherCondition::Haze);
    }

    #[test]
    fn test_owm_code_clouds() {
        assert_eq!(WeatherCondition::from_owm_code(800), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_owm_code(801), WeatherCondition::FewClouds);
        assert_eq!(WeatherCondition::from_owm_code(802), WeatherCondition::ScatteredClouds);
        assert_eq!(WeatherCondition::from_owm_code(803), WeatherCondition::BrokenClouds);
        assert_eq!(WeatherCondition::from_owm_code(804), WeatherCondition::OvercastClouds);
    }

    #[test]
    fn test_owm_code_unknown() {
        assert_eq!(WeatherCondition::from_owm_code(600), WeatherCondition::Unknown);
        assert_eq!(WeatherCondition::from_owm_code(0), WeatherCondition::Unknown);
        assert_eq!(WeatherCondition::Unknown.icon_name(), "");
    }

    #[test]
    fn test_condition_icon_name() {
        assert_eq!(WeatherCondition::Clear.icon_name(), "day");
        assert_eq!(WeatherCondition::Rain.icon_name(), "rainy-7");
    }

    #[test]
    fn test_coordinates_range() {
        assert!(Coordinates::new(6.45, 3.39).is_ok());
        assert!(Coordinates::new(91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
    }

    #[test]
    fn test_response_code_forms() {
        let current: ResponseCode = serde_json::from_str("200").unwrap();
        let forecast: ResponseCode = serde_json::from_str("\"200\"").unwrap();
        let failed: ResponseCode = serde_json::from_str("\"404\"").unwrap();
        assert!(current.is_ok());
        assert!(forecast.is_ok());
        assert!(!failed.is_ok());
    }

    #[test]
    fn test_current_response_parse() {
        let json = serde_json::json!({
            "cod": 200,
            "name": "Lagos",
            "sys": { "country": "NG" },
            "weather": [{ "id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d" }],
            "main": { "temp": 29.3, "feels_like": 33.1, "pressure": 1011, "humidity": 74 },
            "wind": { "speed": 4.12 }
        });
        let response: CurrentResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.location_label(), "Lagos NG");
        assert_eq!(response.primary_condition().unwrap().id, 802);
        assert_eq!(response.main.humidity, 74.0);
    }

    #[test]
    fn test_forecast_days() {
        let items: Vec<serde_json::Value> = (0..20)
            .map(|i| {
                serde_json::json!({
                    "dt": i,
                    "main": { "temp": 20.0 },
                    "weather": [{ "id": 800, "description": "clear sky" }],
                    "dt_txt": "2024-01-15 12:00:00"
                })
            })
            .collect();
        let response: ForecastResponse =
            serde_json::from_value(serde_json::json!({ "cod": "200", "list": items })).unwrap();

        assert_eq!(response.day_count(), 3);
        assert_eq!(response.day(0).len(), 8);
        assert_eq!(response.day(2).len(), 4);
        assert!(response.day(5).is_empty());

        let days = response.days();
        assert_eq!(days.len(), 3);
        assert_eq!(days[2].len(), 4);
        assert_eq!(days[0][0].time, "12 pm");
    }

    #[test]
    fn test_days_capped_and_skip_bad_entries() {
        let mut items: Vec<serde_json::Value> = (0..48u32)
            .map(|i| {
                serde_json::json!({
                    "main": { "temp": 10.0 + f64::from(i) },
                    "weather": [{ "id": 801, "description": "few clouds" }],
                    "dt_txt": "2024-01-15 06:00:00"
                })
            })
            .collect();
        items[9] = serde_json::json!({ "dt": 9 });
        let response: ForecastResponse =
            serde_json::from_value(serde_json::json!({ "cod": "200", "list": items })).unwrap();

        let days = response.days();
        assert_eq!(days.len(), FORECAST_DAYS);
        assert_eq!(days[1].len(), 7);
        assert_eq!(days[1][0].temperature, "18");
        assert_eq!(days[1][1].temperature, "20");
    }

    #[test]
    fn test_forecast_entry_from_item() {
        let item: ForecastItem = serde_json::from_value(serde_json::json!({
            "main": { "temp": 25.2 },
            "weather": [{ "id": 500, "description": "light rain" }],
            "dt_txt": "2024-01-15 15:00:00"
        }))
        .unwrap();
        let entry = ForecastEntry::from_item(&item).unwrap();
        assert_eq!(entry.time, "3 pm");
        assert_eq!(entry.temperature, "26");
        assert_eq!(entry.condition, WeatherCondition::Rain);

        let bare: ForecastItem = serde_json::from_value(serde_json::json!({ "dt": 1 })).unwrap();
        assert!(ForecastEntry::from_item(&bare).is_none());
    }

    #[test]
    fn test_forecast_entry_missing_temp() {
        let item: ForecastItem = serde_json::from_value(serde_json::json!({
            "main": {},
            "weather": [{ "id": 800 }],
            "dt_txt": ""
        }))
        .unwrap();
        let entry = ForecastEntry::from_item(&item).unwrap();
        assert_eq!(entry.temperature, "--");
        assert_eq!(entry.time, "--");
        assert_eq!(entry.description, "No description");
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(WeatherError::NoSavedLocation.user_message(), "No saved location found!");
        let api = WeatherError::Api {
            status: 404,
            message: "city not found".into(),
        };
        assert_eq!(api.user_message(), "city not found");
    }
}
