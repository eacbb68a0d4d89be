//! `stratus onboard` — write a default config file.
//!
//! The file never holds credentials: keys are left blank and are expected to
//! come from the environment or a `.env` file.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use stratus_core::config::{get_config_path, save_config, Config};
use stratus_core::utils::get_history_path;

/// Run the onboard command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "Stratus Setup".cyan().bold());
    println!();

    let config_path = get_config_path();
    if write_default_config(&config_path)? {
        println!("  {} created config at {}", "✓".green(), config_path.display());
    } else {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    }

    if let Some(history_dir) = get_history_path().parent() {
        std::fs::create_dir_all(history_dir)
            .with_context(|| format!("failed to create {}", history_dir.display()))?;
    }

    println!();
    println!(
        "{}",
        "Set OPENAI_API_KEY and WEATHER_API_KEY (or add them to .env), then run `stratus agent`."
            .dimmed()
    );
    println!();

    Ok(())
}

/// Write a default config to `path` unless one exists. Returns whether a file
/// was created.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}
