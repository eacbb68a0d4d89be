//! Weather tool — current conditions from a Weatherstack-compatible API.
//!
//! `GET {api_base}/current?access_key=<key>&query=<city>[&units=<m|f|s>]`

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use stratus_core::config::WeatherConfig;
use stratus_core::error::ToolError;

use super::base::Tool;

/// Used when the config does not set `apiBase`.
pub const DEFAULT_API_BASE: &str = "https://api.weatherstack.com";

/// Name the model uses in `action.function`.
pub const TOOL_NAME: &str = "getWeatherDetails";

const UNITS: &[&str] = &["m", "f", "s"];

/// Looks up current weather for a city name.
pub struct WeatherTool {
    client: Client,
    api_key: String,
    api_base: String,
    units: Option<String>,
}

impl WeatherTool {
    pub fn new(config: &WeatherConfig) -> Result<Self, ToolError> {
        let units = match config.units.as_deref() {
            None => None,
            Some(u) if UNITS.contains(&u) => Some(u.to_string()),
            Some(other) => {
                return Err(ToolError::InvalidInput(format!(
                    "unsupported units '{other}' (expected one of m, f, s)"
                )))
            }
        };

        let client = Client::builder()
            .build()
            .map_err(|e| ToolError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            units,
        })
    }

    fn current_url(&self) -> String {
        format!("{}/current", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "getWeatherDetails is a function that accepts a city name in string format and returns the weather details in json format"
    }

    fn signature(&self) -> String {
        format!("function {TOOL_NAME}(city: string): JSON")
    }

    async fn invoke(&self, input: &str) -> Result<Value, ToolError> {
        let city = input.trim();
        if city.is_empty() {
            return Err(ToolError::InvalidInput("city name must not be empty".into()));
        }

        debug!(city = %city, "fetching weather");

        let mut query: Vec<(&str, &str)> = vec![("access_key", self.api_key.as_str()), ("query", city)];
        if let Some(units) = &self.units {
            query.push(("units", units.as_str()));
        }

        // reqwest errors print the request URL, which carries the access key
        let resp = self
            .client
            .get(self.current_url())
            .query(&query)
            .send()
            .await
            .map_err(|e| ToolError::Request(e.without_url().to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ToolError::Request(e.without_url().to_string()))?;

        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(ToolError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value =
            serde_json::from_str(&text).map_err(|e| ToolError::InvalidResponse(e.to_string()))?;

        // Weatherstack reports invalid cities and bad keys with HTTP 200.
        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let payload = body.get("error").cloned().unwrap_or(body);
            return Err(ToolError::Provider { payload });
        }

        Ok(body)
    }
}
