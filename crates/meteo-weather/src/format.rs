//! Plain-text reports built from upstream payloads.

use std::fmt::Write as _;

use crate::error::Result;
use crate::models::{CurrentConditions, DailyForecast, Location, render};

const ATTRIBUTION: &str = "Data from Open-Meteo API";

/// Current conditions report.
pub fn current_report(location: &Location, conditions: &CurrentConditions) -> Result<String> {
    let time_of_day = if is_truthy(conditions.value("is_day")?) {
        "Day"
    } else {
        "Night"
    };

    let mut text = String::new();
    let _ = writeln!(text, "Current weather for {}:", location.display_name());
    let _ = writeln!(
        text,
        "Temperature: {} (feels like {})",
        conditions.reading("temperature_2m")?,
        conditions.reading("apparent_temperature")?
    );
    let _ = writeln!(text, "Humidity: {}", conditions.reading("relative_humidity_2m")?);
    let _ = writeln!(
        text,
        "Wind: {} at {}",
        conditions.reading("wind_speed_10m")?,
        conditions.reading("wind_direction_10m")?
    );
    let _ = writeln!(text, "Pressure: {}", conditions.reading("pressure_msl")?);
    let _ = writeln!(text, "Cloud Cover: {}", conditions.reading("cloud_cover")?);
    let _ = writeln!(text, "Precipitation: {}", conditions.reading("precipitation")?);
    let _ = writeln!(text, "Time of Day: {}", time_of_day);
    text.push('\n');
    text.push_str(ATTRIBUTION);

    Ok(text)
}

/// Multi-day forecast report, one block per day in upstream order.
pub fn forecast_report(location: &Location, days: i64, forecast: &DailyForecast) -> Result<String> {
    let mut text = format!(
        "Weather forecast for {} ({} days):\n\n",
        location.display_name(),
        days
    );

    for (day, date) in forecast.dates()?.iter().enumerate() {
        let _ = writeln!(text, "📅 {}:", render(date));
        let _ = writeln!(
            text,
            "  🌡️  High: {}, Low: {}",
            forecast.reading("temperature_2m_max", day)?,
            forecast.reading("temperature_2m_min", day)?
        );
        let _ = writeln!(
            text,
            "  🌧️  Precipitation: {}",
            forecast.reading("precipitation_sum", day)?
        );
        let _ = writeln!(
            text,
            "  💨 Max Wind: {}",
            forecast.reading("wind_speed_10m_max", day)?
        );
        text.push('\n');
    }

    text.push_str(ATTRIBUTION);
    Ok(text)
}

/// Location search report.
pub fn location_report(location: &Location) -> String {
    format!(
        "Location: {}\nCoordinates: {}, {}",
        location.display_name(),
        location.latitude,
        location.longitude
    )
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}
