//! Keys of the persistent namespace.

// Preferences
pub const HOME_PAGE_SEEN: &str = "HOME_PAGE_SEEN";
pub const USER_DEFAULT_LOCATION: &str = "USER_DEFAULT_LOCATION";
pub const TRACK_SAVED_LOCATION_WEATHER: &str = "TRACK_SAVED_LOCATION_WEATHER";
pub const WEATHER_UNIT: &str = "WEATHER_UNIT";

// Geolocation, captured once
pub const USER_LATITUDE: &str = "USER_LATITUDE";
pub const USER_LONGITUDE: &str = "USER_LONGITUDE";

// Last-fetched weather snapshot
pub const WEATHER_LOCATION: &str = "WEATHER_LOCATION";
pub const WEATHER_DEG: &str = "WEATHER_DEG";
pub const WEATHER_DESCRIPTION: &str = "WEATHER_DESCRIPTION";
pub const WEATHER_CODE: &str = "WEATHER_CODE";
pub const SUB_WEATHER_WIND_VALUE: &str = "SUB_WEATHER_WIND_VALUE";
pub const SUB_WEATHER_HUMIDITY_VALUE: &str = "SUB_WEATHER_HUMIDITY_VALUE";
pub const SUB_WEATHER_PRESSURE_VALUE: &str = "SUB_WEATHER_PRESSURE_VALUE";

/// Number of cached first-day forecast slots (three-hour buckets).
pub const FORECAST_SLOTS: usize = 8;

/// Field of a cached forecast slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastField {
    Time,
    Icon,
    Unit,
    Title,
}

impl ForecastField {
    /// Key for this field in `slot`, e.g. `WEATHER_FORECAST_TIME_0`.
    pub fn key(self, slot: usize) -> String {
        let field = match self {
            Self::Time => "TIME",
            Self::Icon => "ICON",
            Self::Unit => "UNIT",
            Self::Title => "TITLE",
        };
        format!("WEATHER_FORECAST_{}_{}", field, slot)
    }
}
