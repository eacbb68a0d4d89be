//! Utility helpers — path resolution and string shortening for logs.

use std::path::PathBuf;

/// Get the Stratus data directory (e.g. `~/.stratus/`).
pub fn get_data_path() -> PathBuf {
    let home = dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".stratus")
}

/// Get the REPL history file (e.g. `~/.stratus/history/cli_history`).
pub fn get_history_path() -> PathBuf {
    get_data_path().join("history").join("cli_history")
}

/// Truncate a string to `max_len` characters, adding "..." if truncated.
/// Unicode-safe.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_exact_length() {
        assert_eq!(truncate_string("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        let result = truncate_string(r#"{"type":"plan","plan":"check the city"}"#, 15);
        assert_eq!(result, r#"{"type":"pla..."#);
        assert_eq!(result.chars().count(), 15);
    }

    #[test]
    fn test_truncate_unicode() {
        let result = truncate_string("32°C and sunny", 6);
        assert_eq!(result, "32°...");
    }

    #[test]
    fn test_data_path_ends_with_stratus() {
        assert!(get_data_path().ends_with(".stratus"));
    }

    #[test]
    fn test_history_path() {
        let path = get_history_path();
        assert!(path.ends_with("history/cli_history"));
    }
}
