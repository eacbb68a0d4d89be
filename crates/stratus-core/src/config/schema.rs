//! Configuration schema.
//!
//! Hierarchy: `Config` → `AgentDefaults`, `ProviderConfig`, `WeatherConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ConfigError;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.stratus/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub agent: AgentDefaults,
    pub provider: ProviderConfig,
    pub weather: WeatherConfig,
}

impl Config {
    /// Fail fast on anything that would otherwise break deep inside a turn.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.provider.is_configured() {
            return Err(ConfigError::MissingCredential {
                what: "model provider API key",
                env_var: "OPENAI_API_KEY",
            });
        }
        if !self.weather.is_configured() {
            return Err(ConfigError::MissingCredential {
                what: "weather provider API key",
                env_var: "WEATHER_API_KEY",
            });
        }
        if self.agent.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "agent.model",
                reason: "must not be empty".into(),
            });
        }
        if self.agent.max_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "agent.maxIterations",
                reason: "must be at least 1".into(),
            });
        }
        if self.agent.model_timeout_secs == 0 || self.agent.tool_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "agent timeouts",
                reason: "must be at least 1 second".into(),
            });
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Agent
// ─────────────────────────────────────────────

/// Agent loop settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentDefaults {
    /// Model identifier sent to the completion endpoint.
    pub model: String,
    /// Maximum tokens to generate per reply. `None` leaves it to the endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Maximum model replies per user turn before giving up.
    pub max_iterations: u32,
    /// Per-call bound on the model query.
    pub model_timeout_secs: u64,
    /// Per-call bound on a tool invocation.
    pub tool_timeout_secs: u64,
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: None,
            temperature: 0.7,
            max_iterations: 10,
            model_timeout_secs: 120,
            tool_timeout_secs: 30,
        }
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Model endpoint credentials (OpenAI-compatible).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for Bearer authentication.
    pub api_key: String,
    /// Custom API base URL (defaults to `https://api.openai.com/v1`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Extra HTTP headers to send with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
}

impl ProviderConfig {
    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Weather provider (Weatherstack-compatible) settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeatherConfig {
    /// Access key sent as `access_key`.
    pub api_key: String,
    /// Custom API base URL (defaults to `https://api.weatherstack.com`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Unit system: `m` (metric), `f` (fahrenheit), `s` (scientific).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

impl WeatherConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
