//! City search: turn a partial city name into candidate places.
//! Uses the API Ninjas city endpoint, which requires an API key.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::provider::{build_client, parse_base_url, DEFAULT_TIMEOUT_SECS};
use crate::types::{City, WeatherError};

pub const DEFAULT_CITY_API_URL: &str = "https://api.api-ninjas.com";
/// Maximum number of suggestions returned per search
pub const CITY_RESULT_LIMIT: usize = 4;

const CITY_PATH: &str = "v1/city";

#[derive(Debug, Deserialize)]
struct NinjasErrorBody {
    #[serde(default)]
    error: String,
}

#[derive(Debug, Clone)]
pub struct CitySearch {
    client: Arc<Client>,
    base_url: Url,
    api_key: String,
}

impl CitySearch {
    pub fn new(api_key: &str) -> Result<Self, WeatherError> {
        Self::with_base_url(
            api_key,
            DEFAULT_CITY_API_URL,
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
        })
    }

    /// Search cities by name. A blank term returns nothing without a request.
    #[instrument(skip(self), level = "info")]
    pub async fn search(&self, term: &str) -> Result<Vec<City>, WeatherError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let mut url = self.base_url.join(CITY_PATH)?;
        url.query_pairs_mut()
            .append_pair("name", term)
            .append_pair("limit", &CITY_RESULT_LIMIT.to_string());

        let response = self
            .client
            .get(url)
            .header("X-Api-Key", self.api_key.as_str())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => WeatherError::InvalidApiKey,
                code => WeatherError::Api {
                    status: code,
                    message: serde_json::from_str::<NinjasErrorBody>(&body)
                        .map(|b| b.error)
                        .unwrap_or_else(|_| body.trim().to_string()),
                },
            });
        }

        let mut cities: Vec<City> =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;
        cities.truncate(CITY_RESULT_LIMIT);

        tracing::debug!("City search '{}' matched {} places", term, cities.len());
        Ok(cities)
    }
}
