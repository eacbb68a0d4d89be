//! `stratus status` — show configuration and credential status.
//!
//! Keys are reported as set or missing, never printed.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use stratus_agent::tools::weather::DEFAULT_API_BASE as WEATHER_API_BASE;
use stratus_core::config::{get_config_path, load_config, Config};
use stratus_providers::http_provider::DEFAULT_API_BASE as MODEL_API_BASE;

/// Run the status command.
pub fn run() -> Result<()> {
    let config_path = get_config_path();
    let config = load_config(Some(&config_path));
    print!("{}", render(&config, &config_path));
    Ok(())
}

fn key_status(set: bool) -> String {
    if set {
        format!("{} (key set)", "✓".green())
    } else {
        format!("{}", "· not configured".dimmed())
    }
}

/// Render the status report.
fn render(config: &Config, config_path: &Path) -> String {
    let mut out = String::new();
    let defaults = &config.agent;

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Stratus Status".cyan().bold());
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );
    let _ = writeln!(out, "  {:<18} {}", "Model:".bold(), defaults.model);
    let _ = writeln!(
        out,
        "  {:<18} {}",
        "Parameters:".bold(),
        format!(
            "temp: {} | max_iterations: {} | timeouts: model {}s, tool {}s",
            defaults.temperature,
            defaults.max_iterations,
            defaults.model_timeout_secs,
            defaults.tool_timeout_secs
        )
        .dimmed(),
    );

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {:<18} {}",
        "Model API:".bold(),
        config.provider.api_base.as_deref().unwrap_or(MODEL_API_BASE)
    );
    let _ = writeln!(out, "  {:<18} {}", "", key_status(config.provider.is_configured()));
    let _ = writeln!(
        out,
        "  {:<18} {}",
        "Weather API:".bold(),
        config.weather.api_base.as_deref().unwrap_or(WEATHER_API_BASE)
    );
    let _ = writeln!(out, "  {:<18} {}", "", key_status(config.weather.is_configured()));
    let _ = writeln!(out);

    out
}
