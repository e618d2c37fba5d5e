//! Weather lookups for Meteo.
//!
//! [`OpenMeteo`] resolves free-text places through the Open-Meteo geocoding
//! API and fetches current conditions or daily forecasts for the result.
//! [`format`] turns the payloads into the plain-text reports the tools
//! return. The [`WeatherApi`] trait is the seam the tool layer depends on.

pub mod error;
pub mod format;
pub mod models;
pub mod service;

pub use error::{Result, WeatherError};
pub use models::{CurrentConditions, DailyForecast, Location};
pub use service::{
    CURRENT_FIELDS, DAILY_FIELDS, MAX_FORECAST_DAYS, MIN_FORECAST_DAYS, OpenMeteo,
    OpenMeteoBuilder, WeatherApi, clamp_days,
};
