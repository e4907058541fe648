//! Integration tests for WeatherProvider and CitySearch using wiremock.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use nimbus_services::ApiUnits;
use nimbus_store::keys::{USER_DEFAULT_LOCATION, WEATHER_LOCATION};
use nimbus_store::KvStore;
use nimbus_weather::{
    CitySearch, Coordinates, ForecastQuery, RetryConfig, WeatherCache, WeatherError,
    WeatherProvider,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> WeatherProvider {
    WeatherProvider::with_base_url("test-key", &server.uri(), Duration::from_secs(5))
        .unwrap()
        .with_retry(RetryConfig::new(2, 0, 0))
}

fn current_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "cod": 200,
        "name": name,
        "sys": { "country": "NG" },
        "weather": [{ "id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d" }],
        "main": { "temp": 29.3, "pressure": 1011, "humidity": 74 },
        "wind": { "speed": 4.12 }
    })
}

fn forecast_body() -> serde_json::Value {
    let list: Vec<serde_json::Value> = (0..16)
        .map(|i| {
            serde_json::json!({
                "dt": 1705320000 + i * 10800,
                "main": { "temp": 25.0 + i as f64 / 10.0 },
                "weather": [{ "id": 800, "description": "clear sky" }],
                "dt_txt": format!("2024-01-{} {:02}:00:00", 15 + i / 8, (i % 8) * 3)
            })
        })
        .collect();
    serde_json::json!({ "cod": "200", "list": list, "city": { "name": "Lagos", "country": "NG" } })
}

#[tokio::test]
async fn test_current_by_city_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Lagos"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Lagos")))
        .mount(&mock_server)
        .await;

    let response = provider(&mock_server)
        .current_by_city("Lagos", ApiUnits::Metric)
        .await
        .unwrap();

    assert_eq!(response.location_label(), "Lagos NG");
    assert_eq!(response.main.temp, 29.3);
}

#[tokio::test]
async fn test_current_by_coords_sends_lat_lon() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "6.45"))
        .and(query_param("lon", "3.39"))
        .and(query_param("units", "standard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Ikeja")))
        .mount(&mock_server)
        .await;

    let coords = Coordinates::new(6.45, 3.39).unwrap();
    let response = provider(&mock_server)
        .current_by_coords(coords, ApiUnits::Standard)
        .await
        .unwrap();

    assert_eq!(response.name, "Ikeja");
}

#[tokio::test]
async fn test_unknown_city_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = provider(&mock_server)
        .current_by_city("Atlantis", ApiUnits::Metric)
        .await;

    assert!(matches!(result, Err(WeatherError::LocationNotFound(ref city)) if city == "Atlantis"));
}

#[tokio::test]
async fn test_invalid_api_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key."
        })))
        .mount(&mock_server)
        .await;

    let result = provider(&mock_server)
        .forecast(&ForecastQuery::City("Lagos".into()), ApiUnits::Metric)
        .await;

    assert!(matches!(result, Err(WeatherError::InvalidApiKey)));
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Lagos")))
        .mount(&mock_server)
        .await;

    let response = provider(&mock_server)
        .current_by_city("Lagos", ApiUnits::Metric)
        .await
        .unwrap();

    assert_eq!(response.name, "Lagos");
}

#[tokio::test]
async fn test_persistent_server_error_reports_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "message": "upstream unavailable"
        })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let result = provider(&mock_server)
        .current_by_city("Lagos", ApiUnits::Metric)
        .await;

    match result {
        Err(WeatherError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream unavailable");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_body_code_failure_on_ok_status() {
    let mock_server = MockServer::start().await;

    let mut body = current_body("Lagos");
    body["cod"] = serde_json::json!(429);

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let result = provider(&mock_server)
        .current_by_city("Lagos", ApiUnits::Metric)
        .await;

    assert!(matches!(result, Err(WeatherError::Api { status: 429, .. })));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let result = provider(&mock_server)
        .current_by_city("Lagos", ApiUnits::Metric)
        .await;

    assert!(matches!(result, Err(WeatherError::Parse(_))));
}

#[tokio::test]
async fn test_saved_city_forecast_fills_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "Lagos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Lagos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Lagos")))
        .mount(&mock_server)
        .await;

    let store = Arc::new(KvStore::in_memory());
    store.create(USER_DEFAULT_LOCATION, "Lagos").unwrap();
    let cache = WeatherCache::new(store.clone());
    let provider = provider(&mock_server);

    let query = ForecastQuery::resolve(&store).unwrap();
    let current = provider.current(&query, ApiUnits::Metric).await.unwrap();
    cache.store_current(&current, ApiUnits::Metric).unwrap();

    let forecast = provider.forecast(&query, ApiUnits::Metric).await.unwrap();
    assert_eq!(forecast.day_count(), 2);
    assert_eq!(cache.store_first_day(&forecast).unwrap(), 8);

    assert_eq!(store.get(WEATHER_LOCATION).unwrap().as_deref(), Some("Lagos NG"));

    let slots = cache.forecast_slots().unwrap();
    assert_eq!(slots[0].time, "12 am");
    assert_eq!(slots[0].temperature, "25");
    assert_eq!(slots[7].time, "9 pm");
    assert_eq!(slots[7].temperature, "26");
}

#[tokio::test]
async fn test_city_search_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/city"))
        .and(query_param("name", "San"))
        .and(query_param("limit", "4"))
        .and(header("X-Api-Key", "ninja-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "San Francisco", "latitude": 37.7562, "longitude": -122.443, "country": "US", "population": 3592294, "is_capital": false },
            { "name": "San Diego", "latitude": 32.8312, "longitude": -117.122, "country": "US", "population": 2685420, "is_capital": false }
        ])))
        .mount(&mock_server)
        .await;

    let search =
        CitySearch::with_base_url("ninja-key", &mock_server.uri(), Duration::from_secs(5)).unwrap();
    let cities = search.search(" San ").await.unwrap();

    assert_eq!(cities.len(), 2);
    assert_eq!(cities[0].name, "San Francisco");
    assert_eq!(cities[1].country, "US");
}

#[tokio::test]
async fn test_city_search_caps_results() {
    let mock_server = MockServer::start().await;

    let many: Vec<serde_json::Value> = (0..6)
        .map(|i| {
            serde_json::json!({
                "name": format!("Springfield {}", i),
                "latitude": 39.0,
                "longitude": -89.0
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/v1/city"))
        .respond_with(ResponseTemplate::new(200).set_body_json(many))
        .mount(&mock_server)
        .await;

    let search =
        CitySearch::with_base_url("ninja-key", &mock_server.uri(), Duration::from_secs(5)).unwrap();
    assert_eq!(search.search("Springfield").await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_city_search_rejected_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/city"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": "Invalid API Key."
        })))
        .mount(&mock_server)
        .await;

    let search =
        CitySearch::with_base_url("wrong", &mock_server.uri(), Duration::from_secs(5)).unwrap();
    assert!(matches!(search.search("Paris").await, Err(WeatherError::InvalidApiKey)));
}

#[tokio::test]
async fn test_city_search_bad_request_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/city"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "Missing name parameter."
        })))
        .mount(&mock_server)
        .await;

    let search =
        CitySearch::with_base_url("key", &mock_server.uri(), Duration::from_secs(5)).unwrap();
    let err = search.search("x").await.unwrap_err();
    assert_eq!(err.user_message(), "Missing name parameter.");
}
