//! Shared CLI helpers — output printing, error reporting, version banner.

use colored::Colorize;

use stratus_core::error::AgentError;

/// Format a turn's final answer.
pub fn format_output(output: &str) -> String {
    format!("Output: {output}")
}

/// Print a turn's final answer to stdout.
pub fn print_output(output: &str) {
    println!("{}", format_output(output));
}

/// Print a turn-level error to stderr. The session stays usable.
pub fn print_error(err: &AgentError) {
    eprintln!("{} {err}", "error:".red().bold());
    if let AgentError::Protocol(_) = err {
        eprintln!("{}", "(the model reply was kept in history; try rephrasing)".dimmed());
    }
}

/// Print the banner shown at REPL start.
pub fn print_banner(model: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!(
        "{}  v{}  {}",
        "Stratus".cyan().bold(),
        version.dimmed(),
        model.dimmed()
    );
    println!("{}", "Ask about the weather, or \"exit\" to quit.".dimmed());
    println!();
}

/// Print a "thinking" placeholder while a turn runs.
pub fn print_thinking() {
    eprint!("{}", "thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}
