use agent_tools::tool;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

/// Input for fetching the current weather of a city.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetWeatherParams {
    /// City name.
    pub city: String,
    /// Temperature unit: celsius, fahrenheit or kelvin.
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    "celsius".to_owned()
}

/// Get the current weather for a city.
#[tool(input = GetWeatherParams)]
pub fn get_current_weather(params: GetWeatherParams) -> Value {
    debug!(city = %params.city, unit = %params.unit, "fetching weather");
    json!({
        "temperature": "25°C",
        "city": params.city,
        "description": "sunny",
        "humidity": 60,
    })
}

/// Current time at a location.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetTimeParams {
    /// Location name.
    pub location: String,
    /// Clock format, 12h or 24h
    #[serde(default = "default_clock")]
    pub format: String,
}

fn default_clock() -> String {
    "24h".to_owned()
}

/// Get the current time at a location.
///
/// Registered by hand in `main` rather than through `#[tool]`.
pub fn get_current_time(params: GetTimeParams) -> Value {
    debug!(location = %params.location, format = %params.format, "fetching time");
    json!({
        "time": "2026-01-05 16:30:45",
        "timezone": "Asia/Shanghai",
        "location": params.location,
        "format": params.format,
    })
}
