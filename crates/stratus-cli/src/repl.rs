//! Interactive REPL.
//!
//! Uses `rustyline` for readline-style editing with persistent history. One
//! session lives for the whole REPL, so the conversation and cache carry over
//! between lines.

use anyhow::Result;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use stratus_agent::AgentLoop;
use stratus_core::error::AgentError;
use stratus_core::utils::get_history_path;

use crate::helpers;

const PROMPT: &str = ">> ";

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// Run the interactive REPL loop until end of input.
pub async fn run(agent: AgentLoop) -> Result<()> {
    helpers::print_banner(agent.model());

    let mut editor = create_editor()?;
    let mut session = agent.new_session("cli:repl");

    loop {
        let input = match read_line(&mut editor) {
            Ok(line) => line,
            Err(e) if is_end_of_input(&e) => break,
            Err(e) => {
                save_history(&mut editor);
                return Err(e);
            }
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_exit_command(trimmed) {
            break;
        }

        let _ = editor.add_history_entry(&input);

        debug!(session = session.id(), input = trimmed, "processing input");
        helpers::print_thinking();

        match agent.run_turn(&mut session, trimmed).await {
            Ok(output) => {
                helpers::clear_thinking();
                helpers::print_output(&output);
            }
            Err(e) => {
                helpers::clear_thinking();
                helpers::print_error(&e);
            }
        }
    }

    save_history(&mut editor);
    println!("\nGoodbye!");

    Ok(())
}

/// Read one line; Ctrl-D and Ctrl-C both surface as [`AgentError::EndOfInput`].
fn read_line(editor: &mut Editor<(), DefaultHistory>) -> Result<String> {
    match editor.readline(PROMPT) {
        Ok(line) => Ok(line),
        Err(ReadlineError::Eof | ReadlineError::Interrupted) => Err(AgentError::EndOfInput.into()),
        Err(e) => Err(e.into()),
    }
}

fn is_end_of_input(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<AgentError>(), Some(AgentError::EndOfInput))
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let history_path = get_history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded REPL history from {}", history_path.display());
    }

    Ok(editor)
}

/// Save history to disk.
fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = get_history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

/// Check if input is an exit command.
fn is_exit_command(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
