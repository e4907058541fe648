//! Temperature unit preferences.
//!
//! Two vocabularies share the `WEATHER_UNIT` key: display names
//! (`celsius`, `farenheit`, `kelvin`) and API unit systems
//! (`metric`, `imperial`, `default`).

use serde::{Deserialize, Serialize};

/// Single-character unit abbreviation shown next to temperatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UnitCode {
    #[default]
    #[serde(rename = "c")]
    Celsius,
    #[serde(rename = "f")]
    Fahrenheit,
    #[serde(rename = "k")]
    Kelvin,
}

impl UnitCode {
    /// Map a stored unit name to its code. Unrecognized names are Celsius.
    pub fn from_stored(raw: &str) -> Self {
        match raw {
            "celsius" => Self::Celsius,
            "farenheit" => Self::Fahrenheit,
            "kelvin" => Self::Kelvin,
            _ => Self::Celsius,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Celsius => "c",
            Self::Fahrenheit => "f",
            Self::Kelvin => "k",
        }
    }
}

impl std::fmt::Display for UnitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit system sent to the weather API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiUnits {
    #[default]
    Metric,
    Imperial,
    /// Kelvin. Stored as `default`.
    #[serde(rename = "default")]
    Standard,
}

impl ApiUnits {
    /// Map a settings selector (`"0"`, `"1"`, `"2"`) to a unit system.
    pub fn from_selection(selection: &str) -> Option<Self> {
        match selection {
            "0" => Some(Self::Metric),
            "1" => Some(Self::Standard),
            "2" => Some(Self::Imperial),
            _ => None,
        }
    }

    /// Interpret a stored `WEATHER_UNIT` value in either vocabulary.
    pub fn from_stored(raw: &str) -> Option<Self> {
        match raw {
            "metric" | "celsius" => Some(Self::Metric),
            "imperial" | "farenheit" => Some(Self::Imperial),
            "default" | "kelvin" => Some(Self::Standard),
            _ => None,
        }
    }

    /// Value persisted under `WEATHER_UNIT`.
    pub fn as_stored(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Standard => "default",
        }
    }

    /// Value of the `units` query parameter.
    pub fn query_value(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Standard => "standard",
        }
    }

    pub fn temperature_symbol(self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
            Self::Standard => "K",
        }
    }

    pub fn wind_speed_unit(self) -> &'static str {
        match self {
            Self::Imperial => "mph",
            Self::Metric | Self::Standard => "m/s",
        }
    }
}
