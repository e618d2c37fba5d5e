//! Upstream payload types.
//!
//! Readings are kept as raw JSON values next to their unit strings so that
//! reports reproduce exactly what Open-Meteo sent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, WeatherError};

/// A resolved place. Derived per lookup and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Display name from the geocoder, or the query text.
    pub name: String,
    /// Country name, empty when unknown.
    pub country: String,
}

impl Location {
    /// `"Name, Country"`, or just the name when the country is unknown.
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

/// Geocoding search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct GeocodingResponse {
    /// Omitted by the API when nothing matches.
    #[serde(default)]
    pub results: Vec<GeocodingCandidate>,
}

/// One geocoding match.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeocodingCandidate {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl GeocodingCandidate {
    pub(crate) fn into_location(self, query: &str) -> Location {
        Location {
            latitude: self.latitude,
            longitude: self.longitude,
            name: self.name.unwrap_or_else(|| query.to_string()),
            country: self.country.unwrap_or_default(),
        }
    }
}

/// Current conditions payload (`current` + `current_units`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentConditions {
    /// Resolved timezone name.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Field name to value.
    #[serde(default)]
    pub current: BTreeMap<String, Value>,
    /// Field name to unit string.
    #[serde(default)]
    pub current_units: BTreeMap<String, Value>,
}

impl CurrentConditions {
    /// Raw value of a field.
    pub fn value(&self, field: &str) -> Result<&Value> {
        self.current
            .get(field)
            .ok_or_else(|| WeatherError::missing_field(format!("current.{field}")))
    }

    /// Value immediately followed by its unit, e.g. `31.2°C`.
    pub fn reading(&self, field: &str) -> Result<String> {
        let value = self.value(field)?;
        Ok(format!(
            "{}{}",
            render(value),
            self.current_units.get(field).map(render).unwrap_or_default()
        ))
    }
}

/// Daily forecast payload (`daily` + `daily_units`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyForecast {
    /// Resolved timezone name.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Field name to one value per day.
    #[serde(default)]
    pub daily: BTreeMap<String, Vec<Value>>,
    /// Field name to unit string.
    #[serde(default)]
    pub daily_units: BTreeMap<String, Value>,
}

impl DailyForecast {
    /// Dates of the forecast days, in upstream order.
    pub fn dates(&self) -> Result<&[Value]> {
        self.daily
            .get("time")
            .map(Vec::as_slice)
            .ok_or_else(|| WeatherError::missing_field("daily.time"))
    }

    /// Value for one day followed by its unit.
    pub fn reading(&self, field: &str, day: usize) -> Result<String> {
        let value = self
            .daily
            .get(field)
            .and_then(|values| values.get(day))
            .ok_or_else(|| WeatherError::missing_field(format!("daily.{field}[{day}]")))?;
        Ok(format!(
            "{}{}",
            render(value),
            self.daily_units.get(field).map(render).unwrap_or_default()
        ))
    }
}

/// Render a JSON scalar the way it appears in reports (strings unquoted).
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_candidate_fallbacks() {
        let candidate: GeocodingCandidate =
            serde_json::from_value(json!({"latitude": 1.5, "longitude": -2.25})).unwrap();
        let location = candidate.into_location("Somewhere");
        assert_eq!(location.name, "Somewhere");
        assert_eq!(location.country, "");
        assert_eq!(location.display_name(), "Somewhere");
    }

    #[test]
    fn test_missing_results_is_empty() {
        let response: GeocodingResponse =
            serde_json::from_value(json!({"generationtime_ms": 0.4})).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_current_reading_copies_value_and_unit() {
        let conditions: CurrentConditions = serde_json::from_value(json!({
            "current": {"temperature_2m": 31.0, "relative_humidity_2m": 66},
            "current_units": {"temperature_2m": "°C", "relative_humidity_2m": "%"}
        }))
        .unwrap();

        assert_eq!(conditions.reading("temperature_2m").unwrap(), "31.0°C");
        assert_eq!(conditions.reading("relative_humidity_2m").unwrap(), "66%");
        assert!(matches!(
            conditions.reading("cloud_cover"),
            Err(WeatherError::MissingField(f)) if f == "current.cloud_cover"
        ));
    }

    #[test]
    fn test_daily_reading_out_of_range() {
        let forecast: DailyForecast = serde_json::from_value(json!({
            "daily": {"time": ["2026-10-19"], "precipitation_sum": [0.4]},
            "daily_units": {"precipitation_sum": "mm"}
        }))
        .unwrap();

        assert_eq!(forecast.dates().unwrap().len(), 1);
        assert_eq!(forecast.reading("precipitation_sum", 0).unwrap(), "0.4mm");
        assert!(forecast.reading("precipitation_sum", 1).is_err());
    }
}
