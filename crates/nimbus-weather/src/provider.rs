//! OpenWeatherMap client for current conditions and the 5 day forecast.

use std::sync::Arc;
use std::time::Duration;

use nimbus_services::ApiUnits;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::location::ForecastQuery;
use crate::retry::{self, RetryConfig};
use crate::types::{Coordinates, CurrentResponse, ForecastResponse, ResponseCode, WeatherError};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const CURRENT_PATH: &str = "data/2.5/weather";
const FORECAST_PATH: &str = "data/2.5/forecast";

/// Error body returned by OpenWeatherMap on failure
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: Url,
    api_key: String,
    retry: RetryConfig,
}

impl WeatherProvider {
    pub fn new(api_key: &str) -> Result<Self, WeatherError> {
        Self::with_base_url(
            api_key,
            DEFAULT_BASE_URL,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn with_base_url(
        api_key: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        Ok(Self {
            client: Arc::new(build_client(timeout)?),
            base_url: parse_base_url(base_url)?,
            api_key: api_key.to_string(),
            retry: RetryConfig::default(),
        })
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Current weather for a city name
    #[instrument(skip(self), level = "info")]
    pub async fn current_by_city(
        &self,
        city: &str,
        units: ApiUnits,
    ) -> Result<CurrentResponse, WeatherError> {
        self.current(&ForecastQuery::City(city.to_string()), units).await
    }

    /// Current weather at coordinates
    #[instrument(skip(self), level = "info")]
    pub async fn current_by_coords(
        &self,
        coords: Coordinates,
        units: ApiUnits,
    ) -> Result<CurrentResponse, WeatherError> {
        self.current(&ForecastQuery::Coordinates(coords), units).await
    }

    pub async fn current(
        &self,
        query: &ForecastQuery,
        units: ApiUnits,
    ) -> Result<CurrentResponse, WeatherError> {
        let url = self.endpoint(CURRENT_PATH, query, units)?;
        let response: CurrentResponse = self.fetch(url, query).await?;
        check_code(&response.cod)?;

        tracing::info!("Fetched current weather for {}", response.location_label());
        Ok(response)
    }

    /// 5 day / 3 hour forecast
    #[instrument(skip(self), level = "info")]
    pub async fn forecast(
        &self,
        query: &ForecastQuery,
        units: ApiUnits,
    ) -> Result<ForecastResponse, WeatherError> {
        let url = self.endpoint(FORECAST_PATH, query, units)?;
        let response: ForecastResponse = self.fetch(url, query).await?;
        check_code(&response.cod)?;

        tracing::info!("Fetched {} forecast entries", response.list.len());
        Ok(response)
    }

    fn endpoint(
        &self,
        path: &str,
        query: &ForecastQuery,
        units: ApiUnits,
    ) -> Result<Url, WeatherError> {
        let mut url = self.base_url.join(path)?;
        {
            let mut pairs = url.query_pairs_mut();
            match query {
                ForecastQuery::City(city) => {
                    pairs.append_pair("q", city);
                }
                ForecastQuery::Coordinates(coords) => {
                    pairs
                        .append_pair("lat", &coords.latitude.to_string())
                        .append_pair("lon", &coords.longitude.to_string());
                }
            }
            pairs
                .append_pair("appid", &self.api_key)
                .append_pair("units", units.query_value());
        }
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &ForecastQuery,
    ) -> Result<T, WeatherError> {
        let client = &self.client;
        let response =
            retry::with_retry(self.retry.clone(), || client.get(url.clone()).send()).await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(match status.as_u16() {
                401 => WeatherError::InvalidApiKey,
                404 => WeatherError::LocationNotFound(query.to_string()),
                code => WeatherError::Api {
                    status: code,
                    message: error_message(&body),
                },
            });
        }

        serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))
    }
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client, WeatherError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Parse a service base URL so relative endpoint paths join under it
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, WeatherError> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Ok(Url::parse(trimmed)?)
    } else {
        Ok(Url::parse(&format!("{}/", trimmed))?)
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// The body's `cod` can report failure even on a 200 response
fn check_code(cod: &ResponseCode) -> Result<(), WeatherError> {
    if cod.is_ok() {
        return Ok(());
    }

    let status = match cod {
        ResponseCode::Number(n) => u16::try_from(*n).unwrap_or_default(),
        ResponseCode::Text(s) => s.parse().unwrap_or_default(),
    };
    Err(WeatherError::Api {
        status,
        message: String::new(),
    })
}
