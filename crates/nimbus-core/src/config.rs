use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

pub const WEATHER_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const CITIES_KEY_ENV: &str = "API_NINJAS_KEY";

const APP_DIR: &str = "nimbus";

/// A single configuration problem
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Warnings alone don't make a config invalid
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// All errors joined with "; "
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where preferences and cached weather are persisted
    #[serde(default)]
    pub storage: StorageConfig,

    /// OpenWeatherMap settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// City search settings
    #[serde(default)]
    pub cities: CitiesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database file
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("nimbus.db");
        Self { path }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_url")]
    pub base_url: String,

    /// Falls back to `OPENWEATHER_API_KEY` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_weather_url() -> String {
    nimbus_weather::provider::DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    nimbus_weather::provider::DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    nimbus_weather::retry::DEFAULT_MAX_RETRIES
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl WeatherConfig {
    /// Environment wins over the config file
    pub fn effective_api_key(&self) -> Option<String> {
        pick_key(std::env::var(WEATHER_KEY_ENV).ok(), self.api_key.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitiesConfig {
    #[serde(default = "default_cities_url")]
    pub base_url: String,

    /// Falls back to `API_NINJAS_KEY` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_cities_url() -> String {
    nimbus_weather::geocode::DEFAULT_CITY_API_URL.to_string()
}

impl Default for CitiesConfig {
    fn default() -> Self {
        Self {
            base_url: default_cities_url(),
            api_key: None,
        }
    }
}

impl CitiesConfig {
    pub fn effective_api_key(&self) -> Option<String> {
        pick_key(std::env::var(CITIES_KEY_ENV).ok(), self.api_key.as_deref())
    }
}

fn pick_key(env: Option<String>, file: Option<&str>) -> Option<String> {
    env.filter(|k| !k.trim().is_empty())
        .or_else(|| file.filter(|k| !k.trim().is_empty()).map(str::to_string))
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No config at {}, writing defaults", path.display());
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load and validate. Errors fail the load; warnings are logged.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.weather.base_url, "weather.base_url", &mut result);
        validate_url(&self.cities.base_url, "cities.base_url", &mut result);

        if self.weather.timeout_secs == 0 {
            result.add_error("weather.timeout_secs", "Timeout must be greater than 0");
        } else if self.weather.timeout_secs > 120 {
            result.add_warning("weather.timeout_secs", "Timeout is unusually long (>120s)");
        }

        if self.weather.max_retries > 10 {
            result.add_warning("weather.max_retries", "More than 10 retries configured");
        }

        if self.storage.path.as_os_str().is_empty() {
            result.add_error("storage.path", "Storage path must not be empty");
        } else if self.storage.path.is_dir() {
            result.add_error(
                "storage.path",
                format!("Path is a directory: {}", self.storage.path.display()),
            );
        }

        if self.weather.effective_api_key().is_none() {
            result.add_warning(
                "weather.api_key",
                format!("No weather API key (set {}); fetching is unavailable", WEATHER_KEY_ENV),
            );
        }

        if self.cities.effective_api_key().is_none() {
            result.add_warning(
                "cities.api_key",
                format!("No city search API key (set {}); search is unavailable", CITIES_KEY_ENV),
            );
        }

        result
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// `<config_dir>/nimbus/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join(APP_DIR);

        Ok(config_dir.join("config.toml"))
    }
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }

            if url.port() == Some(0) {
                result.add_error(field_name, "Port cannot be 0");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org");
        assert_eq!(config.cities.base_url, "https://api.api-ninjas.com");
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.weather.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.cities.base_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = Config::default();
        config.weather.timeout_secs = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.timeout_secs"));
    }

    #[test]
    fn test_storage_path_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.path = dir.path().to_path_buf();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "storage.path"));
    }

    #[test]
    fn test_pick_key() {
        assert_eq!(pick_key(Some("env".into()), Some("file")).as_deref(), Some("env"));
        assert_eq!(pick_key(Some("  ".into()), Some("file")).as_deref(), Some("file"));
        assert_eq!(pick_key(None, Some("")), None);
        assert_eq!(pick_key(None, None), None);
    }

    #[test]
    fn test_load_creates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.weather.timeout_secs, 10);
        assert_eq!(config.weather.max_retries, 2);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.storage.path = dir.path().join("prefs.db");
        config.weather.api_key = Some("abc123".to_string());
        config.weather.max_retries = 5;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.storage.path, dir.path().join("prefs.db"));
        assert_eq!(loaded.weather.api_key.as_deref(), Some("abc123"));
        assert_eq!(loaded.weather.max_retries, 5);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[weather]\napi_key = \"k\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.weather.api_key.as_deref(), Some("k"));
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org");
        assert_eq!(config.cities.api_key, None);
    }

    #[test]
    fn test_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[weather\n").unwrap();

        assert!(Config::load_from(&path).is_err());
        assert!(Config::load_validated(Some(&path)).is_err());
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        assert_eq!(result.error_summary(), "field1: error1; field2: error2");
    }
}
