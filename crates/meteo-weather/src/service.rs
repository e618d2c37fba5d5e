//! Open-Meteo lookup service.
//!
//! Each tool call resolves the location first and then fetches weather for
//! the resulting coordinates, so a call costs at most two sequential HTTP
//! round trips. Nothing is cached between calls.

use std::time::Duration;

use meteo_config::{
    DEFAULT_FORECAST_URL, DEFAULT_GEOCODING_URL, DEFAULT_TIMEOUT_SECS, UpstreamConfig,
};
use url::Url;

use crate::error::{Result, WeatherError};
use crate::models::{CurrentConditions, DailyForecast, GeocodingResponse, Location};

/// Fewest forecast days Open-Meteo serves.
pub const MIN_FORECAST_DAYS: i64 = 1;

/// Most forecast days Open-Meteo serves.
pub const MAX_FORECAST_DAYS: i64 = 16;

/// Fields requested for current conditions.
pub const CURRENT_FIELDS: &[&str] = &[
    "temperature_2m",
    "relative_humidity_2m",
    "apparent_temperature",
    "is_day",
    "precipitation",
    "rain",
    "showers",
    "snowfall",
    "weather_code",
    "cloud_cover",
    "pressure_msl",
    "surface_pressure",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_gusts_10m",
];

/// Fields requested for the daily forecast.
pub const DAILY_FIELDS: &[&str] = &[
    "weather_code",
    "temperature_2m_max",
    "temperature_2m_min",
    "apparent_temperature_max",
    "apparent_temperature_min",
    "sunrise",
    "sunset",
    "precipitation_sum",
    "rain_sum",
    "showers_sum",
    "snowfall_sum",
    "precipitation_hours",
    "wind_speed_10m_max",
    "wind_gusts_10m_max",
    "wind_direction_10m_dominant",
];

/// Clamp a requested day count into the range upstream accepts.
pub fn clamp_days(days: i64) -> i64 {
    days.clamp(MIN_FORECAST_DAYS, MAX_FORECAST_DAYS)
}

/// Weather lookups used by the tools.
pub trait WeatherApi: Send + Sync {
    /// Resolve free text to the best matching place.
    fn resolve_location(&self, name: &str) -> Result<Location>;

    /// Current conditions at a coordinate.
    fn fetch_current(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions>;

    /// Daily forecast at a coordinate. `days` is clamped to 1..=16.
    fn fetch_forecast(&self, latitude: f64, longitude: f64, days: i64) -> Result<DailyForecast>;
}

/// [`WeatherApi`] backed by the public Open-Meteo REST API.
#[derive(Debug, Clone)]
pub struct OpenMeteo {
    http: reqwest::blocking::Client,
    geocoding_url: Url,
    forecast_url: Url,
}

impl OpenMeteo {
    /// Create a new builder.
    pub fn builder() -> OpenMeteoBuilder {
        OpenMeteoBuilder::new()
    }

    /// Service configured from the `[upstream]` config section.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        Self::builder()
            .geocoding_url(&config.geocoding_url)
            .forecast_url(&config.forecast_url)
            .timeout(config.timeout())
            .build()
    }

    /// Geocoding endpoint in use.
    pub fn geocoding_url(&self) -> &Url {
        &self.geocoding_url
    }

    /// Forecast endpoint in use.
    pub fn forecast_url(&self) -> &Url {
        &self.forecast_url
    }

    fn get_forecast<T: serde::de::DeserializeOwned>(
        &self,
        what: &'static str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http
            .get(self.forecast_url.clone())
            .query(query)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(what, status = status.as_u16(), "forecast request failed");
            return Err(WeatherError::Status {
                what,
                status: status.as_u16(),
            });
        }

        Ok(response.json()?)
    }
}

impl WeatherApi for OpenMeteo {
    fn resolve_location(&self, name: &str) -> Result<Location> {
        tracing::debug!(query = %name, "resolving location");

        let response = self
            .http
            .get(self.geocoding_url.clone())
            .query(&[("name", name), ("count", "1"), ("language", "en"), ("format", "json")])
            .send()?;

        if !response.status().is_success() {
            tracing::warn!(
                query = %name,
                status = response.status().as_u16(),
                "geocoding request failed"
            );
            return Err(WeatherError::not_found(name));
        }

        let body: GeocodingResponse = response.json()?;
        let location = body
            .results
            .into_iter()
            .next()
            .map(|candidate| candidate.into_location(name))
            .ok_or_else(|| WeatherError::not_found(name))?;

        tracing::debug!(
            query = %name,
            resolved = %location.display_name(),
            latitude = location.latitude,
            longitude = location.longitude,
            "resolved location"
        );

        Ok(location)
    }

    fn fetch_current(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions> {
        self.get_forecast(
            "weather",
            &[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.join(",")),
                ("timezone", "auto".to_string()),
            ],
        )
    }

    fn fetch_forecast(&self, latitude: f64, longitude: f64, days: i64) -> Result<DailyForecast> {
        let forecast_days = clamp_days(days);
        if forecast_days != days {
            tracing::debug!(requested = days, forecast_days, "clamped forecast days");
        }

        self.get_forecast(
            "forecast",
            &[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("daily", DAILY_FIELDS.join(",")),
                ("timezone", "auto".to_string()),
                ("forecast_days", forecast_days.to_string()),
            ],
        )
    }
}

/// Builder for [`OpenMeteo`].
#[derive(Debug)]
pub struct OpenMeteoBuilder {
    geocoding_url: String,
    forecast_url: String,
    timeout: Duration,
}

impl OpenMeteoBuilder {
    /// Create a new builder with the public endpoints.
    pub fn new() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the geocoding endpoint.
    pub fn geocoding_url(mut self, url: impl Into<String>) -> Self {
        self.geocoding_url = url.into();
        self
    }

    /// Set the forecast endpoint.
    pub fn forecast_url(mut self, url: impl Into<String>) -> Self {
        self.forecast_url = url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the service.
    pub fn build(self) -> Result<OpenMeteo> {
        let geocoding_url = Url::parse(&self.geocoding_url)?;
        let forecast_url = Url::parse(&self.forecast_url)?;

        let http = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("meteo/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::debug!(
            geocoding = %geocoding_url,
            forecast = %forecast_url,
            timeout_secs = self.timeout.as_secs(),
            "created Open-Meteo client"
        );

        Ok(OpenMeteo {
            http,
            geocoding_url,
            forecast_url,
        })
    }
}

impl Default for OpenMeteoBuilder {
    fn default() -> Self {
        Self::new()
    }
}
