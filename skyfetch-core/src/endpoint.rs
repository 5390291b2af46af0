use crate::model::WeatherQuery;

/// Default API root. The free tier answers on plain HTTP; deployments that
/// want TLS can point `base_url` at the `https` host instead.
pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org";

/// Path of the current-weather operation.
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Declarative handle on the remote weather API.
///
/// Knows where the API lives and how its one operation is shaped. Composing
/// a call performs no I/O, has no side effects, and cannot fail; everything
/// that can go wrong is deferred to execution.
#[derive(Debug, Clone)]
pub struct WeatherEndpoint {
    base_url: String,
}

impl WeatherEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self { base_url: base_url.trim_end_matches('/').to_string() }
    }

    /// Describe a `GET /data/2.5/weather` for the given query.
    ///
    /// Returns an inert call object; hand it to the executor to run it.
    pub fn current_weather(&self, query: &WeatherQuery) -> WeatherCall {
        WeatherCall {
            url: format!("{}{CURRENT_WEATHER_PATH}", self.base_url),
            params: vec![
                ("q", query.city.clone()),
                ("units", query.units.as_str().to_string()),
                ("APPID", query.api_key.clone()),
            ],
        }
    }
}

impl Default for WeatherEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// A composed, not-yet-executed request for one `WeatherRecord`.
#[derive(Debug, Clone)]
pub struct WeatherCall {
    url: String,
    params: Vec<(&'static str, String)>,
}

impl WeatherCall {
    /// Full request URL without the query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query parameters in the order they go on the wire.
    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }
}
