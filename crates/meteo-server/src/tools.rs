//! Weather tools and the registry that dispatches to them.
//!
//! Every tool failure is reported as text inside a successful
//! [`CallToolResult`]; the serve loop never turns a lookup failure into a
//! JSON-RPC error.

use std::sync::Arc;

use meteo_mcp::{CallToolResult, ToolInfo};
use meteo_weather::{MAX_FORECAST_DAYS, MIN_FORECAST_DAYS, WeatherApi, clamp_days, format};
use serde_json::{Value, json};

/// Text returned when the `location` argument is missing or empty.
pub const LOCATION_REQUIRED: &str = "Error: Location is required";

/// Forecast length used when `days` is absent.
pub const DEFAULT_FORECAST_DAYS: i64 = 7;

// ─────────────────────────────────────────────────────────────────────────────
// Tool Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A named, schema-described operation callable through `tools/call`.
pub trait Tool: Send + Sync {
    /// Unique tool name.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON Schema for the arguments.
    fn parameters(&self) -> Value;

    /// Run the tool. Failures are carried in the returned text.
    fn execute(&self, params: &Value) -> CallToolResult;

    /// Descriptor advertised by `tools/list`.
    fn info(&self) -> ToolInfo {
        ToolInfo {
            name: self.name().to_string(),
            description: Some(self.description().to_string()),
            input_schema: Some(self.parameters()),
        }
    }
}

/// Argument accessors for tool params.
trait ParamExt {
    /// A string argument that is present and non-empty.
    fn non_empty_str(&self, name: &str) -> Option<&str>;

    /// An integer argument with default.
    fn optional_i64(&self, name: &str, default: i64) -> i64;
}

impl ParamExt for Value {
    fn non_empty_str(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    fn optional_i64(&self, name: &str, default: i64) -> i64 {
        self.get(name).and_then(|v| v.as_i64()).unwrap_or(default)
    }
}

fn location_schema(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Weather Tools
// ─────────────────────────────────────────────────────────────────────────────

/// `get_current_weather`: current conditions for a place.
#[derive(Clone)]
pub struct CurrentWeatherTool {
    api: Arc<dyn WeatherApi>,
}

impl CurrentWeatherTool {
    pub fn new(api: Arc<dyn WeatherApi>) -> Self {
        Self { api }
    }

    fn lookup(&self, location: &str) -> meteo_weather::Result<String> {
        let place = self.api.resolve_location(location)?;
        let conditions = self.api.fetch_current(place.latitude, place.longitude)?;
        format::current_report(&place, &conditions)
    }
}

impl Tool for CurrentWeatherTool {
    fn name(&self) -> &str {
        "get_current_weather"
    }

    fn description(&self) -> &str {
        "Get current weather conditions for a location"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": location_schema("City name, e.g., 'Bangkok, Thailand' or 'New York'")
            },
            "required": ["location"]
        })
    }

    fn execute(&self, params: &Value) -> CallToolResult {
        let Some(location) = params.non_empty_str("location") else {
            return CallToolResult::text_content(LOCATION_REQUIRED);
        };

        match self.lookup(location) {
            Ok(text) => CallToolResult::text_content(text),
            Err(e) => {
                tracing::warn!(tool = self.name(), location, error = %e, "lookup failed");
                CallToolResult::text_content(format!("Error getting weather: {e}"))
            }
        }
    }
}

/// `get_weather_forecast`: daily forecast for a place.
#[derive(Clone)]
pub struct ForecastTool {
    api: Arc<dyn WeatherApi>,
}

impl ForecastTool {
    pub fn new(api: Arc<dyn WeatherApi>) -> Self {
        Self { api }
    }

    fn lookup(&self, location: &str, days: i64) -> meteo_weather::Result<String> {
        let place = self.api.resolve_location(location)?;
        let forecast = self
            .api
            .fetch_forecast(place.latitude, place.longitude, days)?;
        format::forecast_report(&place, days, &forecast)
    }
}

impl Tool for ForecastTool {
    fn name(&self) -> &str {
        "get_weather_forecast"
    }

    fn description(&self) -> &str {
        "Get weather forecast for a location"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": location_schema("City name, e.g., 'Bangkok, Thailand' or 'New York'"),
                "days": {
                    "type": "integer",
                    "description": "Number of forecast days (1-16)",
                    "default": DEFAULT_FORECAST_DAYS,
                    "minimum": MIN_FORECAST_DAYS,
                    "maximum": MAX_FORECAST_DAYS
                }
            },
            "required": ["location"]
        })
    }

    fn execute(&self, params: &Value) -> CallToolResult {
        let Some(location) = params.non_empty_str("location") else {
            return CallToolResult::text_content(LOCATION_REQUIRED);
        };
        let days = clamp_days(params.optional_i64("days", DEFAULT_FORECAST_DAYS));

        match self.lookup(location, days) {
            Ok(text) => CallToolResult::text_content(text),
            Err(e) => {
                tracing::warn!(tool = self.name(), location, days, error = %e, "lookup failed");
                CallToolResult::text_content(format!("Error getting forecast: {e}"))
            }
        }
    }
}

/// `search_location`: resolve a place to coordinates.
#[derive(Clone)]
pub struct SearchLocationTool {
    api: Arc<dyn WeatherApi>,
}

impl SearchLocationTool {
    pub fn new(api: Arc<dyn WeatherApi>) -> Self {
        Self { api }
    }
}

impl Tool for SearchLocationTool {
    fn name(&self) -> &str {
        "search_location"
    }

    fn description(&self) -> &str {
        "Search for location coordinates"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": location_schema("Location name to search for")
            },
            "required": ["location"]
        })
    }

    fn execute(&self, params: &Value) -> CallToolResult {
        let Some(location) = params.non_empty_str("location") else {
            return CallToolResult::text_content(LOCATION_REQUIRED);
        };

        match self.api.resolve_location(location) {
            Ok(place) => CallToolResult::text_content(format::location_report(&place)),
            Err(e) => {
                tracing::warn!(tool = self.name(), location, error = %e, "lookup failed");
                CallToolResult::text_content(format!("Error searching location: {e}"))
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered collection of tools.
///
/// Tools are listed in registration order. Registering a name twice
/// replaces the earlier tool in place.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry holding the three weather tools over one lookup service.
    pub fn weather(api: Arc<dyn WeatherApi>) -> Self {
        let mut registry = Self::new();
        registry.register(CurrentWeatherTool::new(Arc::clone(&api)));
        registry.register(ForecastTool::new(Arc::clone(&api)));
        registry.register(SearchLocationTool::new(api));
        registry
    }

    /// Register a tool.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_arc(Arc::new(tool));
    }

    /// Register a tool from an Arc.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(index) => self.tools[index] = tool,
            None => self.tools.push(tool),
        }
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// Get all tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Get the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Descriptors for `tools/list`.
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools.iter().map(|t| t.info()).collect()
    }

    /// Dispatch a call by name. Unknown names become result text.
    pub fn call(&self, name: &str, params: &Value) -> CallToolResult {
        match self.get(name) {
            Some(tool) => {
                tracing::debug!(tool = name, "executing tool");
                tool.execute(params)
            }
            None => {
                tracing::warn!(tool = name, "unknown tool");
                CallToolResult::text_content(format!("Unknown tool: {name}"))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use meteo_weather::{CurrentConditions, DailyForecast, Location, WeatherError};
    use std::sync::Mutex;

    /// In-memory lookup service recording every call.
    #[derive(Default)]
    pub(crate) struct FakeWeather {
        pub calls: Mutex<Vec<String>>,
        pub fail_status: Option<u16>,
    }

    impl FakeWeather {
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl WeatherApi for FakeWeather {
        fn resolve_location(&self, name: &str) -> meteo_weather::Result<Location> {
            self.calls.lock().unwrap().push(format!("resolve:{name}"));
            match name {
                "Bangkok, Thailand" | "Bangkok" => Ok(Location {
                    latitude: 13.7563,
                    longitude: 100.5018,
                    name: "Bangkok".to_string(),
                    country: "Thailand".to_string(),
                }),
                _ => Err(WeatherError::not_found(name)),
            }
        }

        fn fetch_current(&self, lat: f64, lon: f64) -> meteo_weather::Result<CurrentConditions> {
            self.calls.lock().unwrap().push(format!("current:{lat},{lon}"));
            if let Some(status) = self.fail_status {
                return Err(WeatherError::Status {
                    what: "weather",
                    status,
                });
            }
            Ok(serde_json::from_value(json!({
                "current": {
                    "temperature_2m": 31.4,
                    "apparent_temperature": 36.2,
                    "relative_humidity_2m": 70,
                    "wind_speed_10m": 9.7,
                    "wind_direction_10m": 225,
                    "pressure_msl": 1008.9,
                    "cloud_cover": 75,
                    "precipitation": 0.0,
                    "is_day": 0
                },
                "current_units": {
                    "temperature_2m": "°C",
                    "apparent_temperature": "°C",
                    "relative_humidity_2m": "%",
                    "wind_speed_10m": "km/h",
                    "wind_direction_10m": "°",
                    "pressure_msl": "hPa",
                    "cloud_cover": "%",
                    "precipitation": "mm"
                }
            }))
            .unwrap())
        }

        fn fetch_forecast(
            &self,
            lat: f64,
            lon: f64,
            days: i64,
        ) -> meteo_weather::Result<DailyForecast> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("forecast:{lat},{lon},{days}"));
            let dates: Vec<String> = (1..=days).map(|d| format!("2026-10-{:02}", d)).collect();
            let n = dates.len();
            Ok(serde_json::from_value(json!({
                "daily": {
                    "time": dates,
                    "temperature_2m_max": vec![30.0; n],
                    "temperature_2m_min": vec![24.0; n],
                    "precipitation_sum": vec![1.5; n],
                    "wind_speed_10m_max": vec![12.0; n]
                },
                "daily_units": {
                    "temperature_2m_max": "°C",
                    "temperature_2m_min": "°C",
                    "precipitation_sum": "mm",
                    "wind_speed_10m_max": "km/h"
                }
            }))
            .unwrap())
        }
    }

    fn registry() -> (ToolRegistry, Arc<FakeWeather>) {
        let fake = Arc::new(FakeWeather::default());
        (ToolRegistry::weather(fake.clone()), fake)
    }

    fn text(result: &CallToolResult) -> &str {
        result.first_text().unwrap()
    }

    #[test]
    fn test_registry_order() {
        let (registry, _) = registry();
        assert_eq!(
            registry.names(),
            vec!["get_current_weather", "get_weather_forecast", "search_location"]
        );
        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_forecast_schema() {
        let (registry, _) = registry();
        let info = &registry.list_tools()[1];
        let schema = info.input_schema.as_ref().unwrap();
        let days = &schema["properties"]["days"];
        assert_eq!(days["default"], 7);
        assert_eq!(days["minimum"], 1);
        assert_eq!(days["maximum"], 16);
        assert_eq!(schema["required"], json!(["location"]));
    }

    #[test]
    fn test_missing_location_makes_no_lookup() {
        let (registry, fake) = registry();
        for tool in registry.names() {
            for params in [json!({}), json!({"location": ""}), json!({"location": 42})] {
                let result = registry.call(tool, &params);
                assert_eq!(text(&result), LOCATION_REQUIRED);
                assert!(!result.is_error());
            }
        }
        assert_eq!(fake.call_count(), 0);
    }

    #[test]
    fn test_unknown_tool() {
        let (registry, fake) = registry();
        let result = registry.call("bogus_tool", &json!({}));
        assert_eq!(text(&result), "Unknown tool: bogus_tool");
        assert_eq!(fake.call_count(), 0);
    }

    #[test]
    fn test_current_weather() {
        let (registry, fake) = registry();
        let result = registry.call(
            "get_current_weather",
            &json!({"location": "Bangkok, Thailand"}),
        );
        let text = text(&result);
        assert!(text.starts_with("Current weather for Bangkok, Thailand:"));
        assert!(text.contains("Temperature: 31.4°C"));
        assert!(text.contains("Time of Day: Night"));
        assert_eq!(fake.call_count(), 2);
    }

    #[test]
    fn test_not_found_is_soft_failure() {
        let (registry, fake) = registry();
        let result = registry.call("get_current_weather", &json!({"location": "Atlantis"}));
        assert_eq!(
            text(&result),
            "Error getting weather: Location 'Atlantis' not found"
        );
        assert_eq!(fake.call_count(), 1);

        let result = registry.call("search_location", &json!({"location": "Atlantis"}));
        assert_eq!(
            text(&result),
            "Error searching location: Location 'Atlantis' not found"
        );
    }

    #[test]
    fn test_upstream_status_is_soft_failure() {
        let fake = Arc::new(FakeWeather {
            fail_status: Some(503),
            ..Default::default()
        });
        let registry = ToolRegistry::weather(fake);
        let result = registry.call("get_current_weather", &json!({"location": "Bangkok"}));
        assert_eq!(
            text(&result),
            "Error getting weather: Failed to fetch weather data: 503"
        );
    }

    #[test]
    fn test_forecast_days_default_and_clamp() {
        let (registry, fake) = registry();

        let result = registry.call("get_weather_forecast", &json!({"location": "Bangkok"}));
        assert!(text(&result).starts_with("Weather forecast for Bangkok, Thailand (7 days):\n\n"));

        let result = registry.call(
            "get_weather_forecast",
            &json!({"location": "Bangkok", "days": 30}),
        );
        assert!(text(&result).contains("(16 days)"));

        let result = registry.call(
            "get_weather_forecast",
            &json!({"location": "Bangkok", "days": 0}),
        );
        assert!(text(&result).contains("(1 days)"));
        assert_eq!(text(&result).matches("📅").count(), 1);

        let calls = fake.calls.lock().unwrap();
        assert!(calls.contains(&"forecast:13.7563,100.5018,7".to_string()));
        assert!(calls.contains(&"forecast:13.7563,100.5018,16".to_string()));
        assert!(calls.contains(&"forecast:13.7563,100.5018,1".to_string()));
    }

    #[test]
    fn test_forecast_not_found() {
        let (registry, _) = registry();
        let result = registry.call("get_weather_forecast", &json!({"location": "Nowhere"}));
        assert_eq!(
            text(&result),
            "Error getting forecast: Location 'Nowhere' not found"
        );
    }

    #[test]
    fn test_search_location() {
        let (registry, _) = registry();
        let result = registry.call("search_location", &json!({"location": "Bangkok"}));
        assert_eq!(
            text(&result),
            "Location: Bangkok, Thailand\nCoordinates: 13.7563, 100.5018"
        );
    }

    #[test]
    fn test_register_replaces_in_place() {
        let (mut registry, _) = registry();
        let api: Arc<dyn WeatherApi> = Arc::new(FakeWeather::default());
        registry.register(CurrentWeatherTool::new(api));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names()[0], "get_current_weather");
    }
}
