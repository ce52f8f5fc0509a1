//! Open-Meteo forecast client

use serde::Deserialize;

use crate::error::FetchError;
use crate::state::WeatherReading;

pub const DEFAULT_API_BASE: &str = "https://api.open-meteo.com";

/// Variables requested in the `current` block. Humidity is requested but not shown.
const CURRENT_VARIABLES: [&str; 6] = [
    "temperature_2m",
    "relative_humidity_2m",
    "precipitation",
    "rain",
    "weather_code",
    "cloud_cover",
];

/// Hourly series requested alongside; not decoded
const HOURLY_VARIABLES: &str = "temperature_2m";

// ============================================================================
// Response shape
// ============================================================================

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentConditions>,
}

/// Every field optional so absence surfaces as `MissingField`, not a serde error
#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: Option<f64>,
    precipitation: Option<f64>,
    rain: Option<f64>,
    weather_code: Option<u8>,
    cloud_cover: Option<f64>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, FetchError> {
    value.ok_or_else(|| FetchError::MissingField(format!("current.{field}")))
}

impl TryFrom<CurrentConditions> for WeatherReading {
    type Error = FetchError;

    fn try_from(current: CurrentConditions) -> Result<Self, Self::Error> {
        Ok(WeatherReading {
            temperature: required(current.temperature_2m, "temperature_2m")?,
            precipitation: required(current.precipitation, "precipitation")?,
            rain: required(current.rain, "rain")?,
            weather_code: required(current.weather_code, "weather_code")?,
            cloud_cover: required(current.cloud_cover, "cloud_cover")?,
        })
    }
}

/// Decode a forecast response body into a reading
pub fn decode_reading(body: &str) -> Result<WeatherReading, FetchError> {
    let response: ForecastResponse = serde_json::from_str(body)?;
    let current = response
        .current
        .ok_or_else(|| FetchError::MissingField("current".into()))?;
    WeatherReading::try_from(current)
}

// ============================================================================
// Client
// ============================================================================

/// Issues one forecast request per call. Cheap to clone.
#[derive(Clone, Debug)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn forecast_url(&self) -> String {
        format!("{}/v1/forecast", self.base_url)
    }

    /// Query string for a forecast request at the given coordinate
    pub fn forecast_query(latitude: f64, longitude: f64) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_VARIABLES.join(",")),
            ("hourly", HOURLY_VARIABLES.to_string()),
        ]
    }

    /// Fetch current conditions for a coordinate
    pub async fn fetch(&self, latitude: f64, longitude: f64) -> Result<WeatherReading, FetchError> {
        let url = self.forecast_url();
        tracing::debug!(%url, latitude, longitude, "requesting current weather");

        let response = self
            .http
            .get(&url)
            .query(&Self::forecast_query(latitude, longitude))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        decode_reading(&body)
    }
}
