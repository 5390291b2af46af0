use serde::{Deserialize, Serialize};

/// A single current-weather lookup.
///
/// Constructed fresh for every request; immutable once built and carrying
/// no identity beyond its field values.
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    /// City name as accepted by the API's `q` parameter, e.g. "London".
    pub city: String,
    pub units: Units,
    /// OpenWeatherMap APPID.
    pub api_key: String,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>, units: Units, api_key: impl Into<String>) -> Self {
        Self { city: city.into(), units, api_key: api_key.into() }
    }
}

/// OpenWeatherMap unit systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Units {
    /// Celsius.
    #[default]
    Metric,
    /// Fahrenheit.
    Imperial,
    /// Kelvin, what the API falls back to when no `units` is sent.
    Standard,
}

impl Units {
    /// Wire form, as sent in the `units` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    /// Unit name appended to rendered temperatures.
    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "Celsius",
            Units::Imperial => "Fahrenheit",
            Units::Standard => "Kelvin",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial, standard."
            )),
        }
    }
}

/// Parsed current-weather payload.
///
/// Only the nested `main` block is kept; every other field in the response
/// body is ignored. Produced per response and consumed immediately by the
/// presentation layer, nothing is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub main: MainReadings,
}

/// The `main` section of the API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    /// Temperature in the unit system the query asked for.
    pub temp: f64,
    /// Atmospheric pressure in hPa.
    pub pressure: u32,
    /// Relative humidity in percent.
    pub humidity: u8,
}
