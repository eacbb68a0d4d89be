//! Config loader — reads `~/.stratus/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.stratus/config.json`
//! 3. Environment variables (override JSON):
//!    - the conventional `OPENAI_API_KEY` and `WEATHER_API_KEY`
//!    - `STRATUS_<SECTION>__<FIELD>` (double underscore as delimiter), which
//!      win over the conventional names

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the given (or default) path + process env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    let config = load_config_from_path(&config_path);
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment overrides on top of a loaded config.
///
/// `lookup` resolves a variable name; production passes `std::env::var`.
///
/// Supported overrides:
/// - `OPENAI_API_KEY` / `STRATUS_PROVIDER__API_KEY` → `provider.api_key`
/// - `STRATUS_PROVIDER__API_BASE` → `provider.api_base`
/// - `WEATHER_API_KEY` / `STRATUS_WEATHER__API_KEY` → `weather.api_key`
/// - `STRATUS_WEATHER__API_BASE` → `weather.api_base`
/// - `STRATUS_WEATHER__UNITS` → `weather.units`
/// - `STRATUS_AGENT__MODEL` → `agent.model`
/// - `STRATUS_AGENT__MAX_TOKENS` → `agent.max_tokens`
/// - `STRATUS_AGENT__TEMPERATURE` → `agent.temperature`
/// - `STRATUS_AGENT__MAX_ITERATIONS` → `agent.max_iterations`
/// - `STRATUS_AGENT__MODEL_TIMEOUT_SECS` → `agent.model_timeout_secs`
/// - `STRATUS_AGENT__TOOL_TIMEOUT_SECS` → `agent.tool_timeout_secs`
pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    // Credentials
    if let Some(val) = lookup("OPENAI_API_KEY") {
        config.provider.api_key = val;
    }
    if let Some(val) = lookup("STRATUS_PROVIDER__API_KEY") {
        config.provider.api_key = val;
    }
    if let Some(val) = lookup("STRATUS_PROVIDER__API_BASE") {
        config.provider.api_base = Some(val);
    }
    if let Some(val) = lookup("WEATHER_API_KEY") {
        config.weather.api_key = val;
    }
    if let Some(val) = lookup("STRATUS_WEATHER__API_KEY") {
        config.weather.api_key = val;
    }
    if let Some(val) = lookup("STRATUS_WEATHER__API_BASE") {
        config.weather.api_base = Some(val);
    }
    if let Some(val) = lookup("STRATUS_WEATHER__UNITS") {
        config.weather.units = Some(val);
    }

    // Agent
    if let Some(val) = lookup("STRATUS_AGENT__MODEL") {
        config.agent.model = val;
    }
    if let Some(val) = lookup("STRATUS_AGENT__MAX_TOKENS") {
        match val.parse::<u32>() {
            Ok(n) => config.agent.max_tokens = Some(n),
            Err(_) => warn!("Ignoring STRATUS_AGENT__MAX_TOKENS={val}: not an integer"),
        }
    }
    if let Some(val) = lookup("STRATUS_AGENT__TEMPERATURE") {
        match val.parse::<f64>() {
            Ok(t) => config.agent.temperature = t,
            Err(_) => warn!("Ignoring STRATUS_AGENT__TEMPERATURE={val}: not a number"),
        }
    }
    if let Some(val) = lookup("STRATUS_AGENT__MAX_ITERATIONS") {
        match val.parse::<u32>() {
            Ok(n) => config.agent.max_iterations = n,
            Err(_) => warn!("Ignoring STRATUS_AGENT__MAX_ITERATIONS={val}: not an integer"),
        }
    }
    if let Some(val) = lookup("STRATUS_AGENT__MODEL_TIMEOUT_SECS") {
        match val.parse::<u64>() {
            Ok(n) => config.agent.model_timeout_secs = n,
            Err(_) => warn!("Ignoring STRATUS_AGENT__MODEL_TIMEOUT_SECS={val}: not an integer"),
        }
    }
    if let Some(val) = lookup("STRATUS_AGENT__TOOL_TIMEOUT_SECS") {
        match val.parse::<u64>() {
            Ok(n) => config.agent.tool_timeout_secs = n,
            Err(_) => warn!("Ignoring STRATUS_AGENT__TOOL_TIMEOUT_SECS={val}: not an integer"),
        }
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config.agent.max_iterations, 10);
        assert_eq!(config.agent.model, "gpt-4o-mini");
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r#"{
            "agent": { "model": "gpt-4o", "maxIterations": 4 },
            "weather": { "apiKey": "ws-123", "units": "f" }
        }"#,
        );

        let config = load_config_from_path(file.path());
        assert_eq!(config.agent.model, "gpt-4o");
        assert_eq!(config.agent.max_iterations, 4);
        assert_eq!(config.weather.api_key, "ws-123");
        assert_eq!(config.weather.units.as_deref(), Some("f"));
        // Default preserved
        assert_eq!(config.agent.tool_timeout_secs, 30);
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config.agent.max_iterations, 10);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.agent.model = "gpt-4.1-mini".to_string();
        config.provider.api_key = "sk-test".to_string();

        save_config(&config, Some(&path)).unwrap();

        let reloaded = load_config_from_path(&path);
        assert_eq!(reloaded.agent.model, "gpt-4.1-mini");
        assert_eq!(reloaded.provider.api_key, "sk-test");
    }

    #[test]
    fn test_conventional_key_names() {
        let config = apply_env_overrides(
            Config::default(),
            env(&[("OPENAI_API_KEY", "sk-env"), ("WEATHER_API_KEY", "ws-env")]),
        );
        assert_eq!(config.provider.api_key, "sk-env");
        assert_eq!(config.weather.api_key, "ws-env");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_prefixed_keys_win() {
        let config = apply_env_overrides(
            Config::default(),
            env(&[
                ("OPENAI_API_KEY", "sk-plain"),
                ("STRATUS_PROVIDER__API_KEY", "sk-prefixed"),
                ("STRATUS_PROVIDER__API_BASE", "http://localhost:8080/v1"),
            ]),
        );
        assert_eq!(config.provider.api_key, "sk-prefixed");
        assert_eq!(
            config.provider.api_base.as_deref(),
            Some("http://localhost:8080/v1")
        );
    }

    #[test]
    fn test_env_overrides_agent_settings() {
        let config = apply_env_overrides(
            Config::default(),
            env(&[
                ("STRATUS_AGENT__MODEL", "test-model"),
                ("STRATUS_AGENT__MAX_ITERATIONS", "3"),
                ("STRATUS_AGENT__TOOL_TIMEOUT_SECS", "5"),
                ("STRATUS_AGENT__MAX_TOKENS", "512"),
            ]),
        );
        assert_eq!(config.agent.model, "test-model");
        assert_eq!(config.agent.max_iterations, 3);
        assert_eq!(config.agent.tool_timeout_secs, 5);
        assert_eq!(config.agent.max_tokens, Some(512));
    }

    #[test]
    fn test_unparseable_override_is_ignored() {
        let config = apply_env_overrides(
            Config::default(),
            env(&[("STRATUS_AGENT__MAX_ITERATIONS", "lots")]),
        );
        assert_eq!(config.agent.max_iterations, 10);
    }

    #[test]
    fn test_blank_env_does_not_clear_file_key() {
        let mut config = Config::default();
        config.weather.api_key = "from-file".into();
        let config = apply_env_overrides(config, env(&[("WEATHER_API_KEY", "")]));
        assert_eq!(config.weather.api_key, "from-file");
    }
}
