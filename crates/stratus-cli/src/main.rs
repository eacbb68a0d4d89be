//! Stratus CLI — entry point.
//!
//! # Commands
//!
//! - `stratus agent [-m MESSAGE] [--logs]` — weather chat (single-shot or REPL)
//! - `stratus onboard` — write a default config file
//! - `stratus status` — show configuration and credential status

mod helpers;
mod onboard;
mod repl;
mod status;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use stratus_agent::{AgentLoop, LoopSettings, ToolRegistry, WeatherTool};
use stratus_core::config::{load_config, Config};
use stratus_core::error::AgentError;
use stratus_providers::HttpProvider;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Stratus — a weather assistant driven by a JSON-mode language model
#[derive(Parser)]
#[command(name = "stratus", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the agent (single-shot or interactive REPL)
    Agent {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Write a default config file to ~/.stratus/config.json
    Onboard,

    /// Show configuration and credential status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env sits between the config file and the process environment
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Agent { message, logs } => {
            init_logging(logs);
            run_agent(message).await
        }
        Commands::Onboard => onboard::run(),
        Commands::Status => status::run(),
    }
}

// ─────────────────────────────────────────────
// Agent command
// ─────────────────────────────────────────────

async fn run_agent(message: Option<String>) -> Result<()> {
    let config = load_config(None);
    let agent_loop = build_agent_loop(&config)?;

    match message {
        Some(msg) => {
            // Single-shot mode
            info!("processing single message");
            let mut session = agent_loop.new_session("cli:oneshot");
            let output = agent_loop
                .run_turn(&mut session, &msg)
                .await
                .context("agent turn failed")?;
            helpers::print_output(&output);
        }
        None => {
            // Interactive REPL mode
            repl::run(agent_loop).await?;
        }
    }

    Ok(())
}

/// Build an `AgentLoop` from the loaded configuration.
///
/// Fails before any session exists if a credential is missing or a limit is
/// zero.
pub fn build_agent_loop(config: &Config) -> Result<AgentLoop> {
    config
        .validate()
        .map_err(AgentError::Config)
        .context("invalid configuration")?;

    let defaults = &config.agent;

    let provider = HttpProvider::with_call_bound(
        &config.provider,
        &defaults.model,
        Duration::from_secs(defaults.model_timeout_secs),
    )
    .context("failed to create model provider")?;

    let weather = WeatherTool::new(&config.weather).context("failed to create weather tool")?;
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(weather));

    Ok(AgentLoop::new(Arc::new(provider), tools, LoopSettings::from(defaults)))
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("stratus=debug,info")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
