//! Error taxonomy for Stratus.
//!
//! Tool-level failures ([`ToolError`]) are recoverable and are forwarded to the
//! model as observations. Everything in [`AgentError`] is surfaced to the human
//! operator; [`ConfigError`] aborts the process before a session starts.

use serde_json::{json, Value};
use thiserror::Error;

/// Result alias for a single agent turn.
pub type Result<T> = std::result::Result<T, AgentError>;

// ─────────────────────────────────────────────
// Top-level turn error
// ─────────────────────────────────────────────

/// Everything that can abort a user turn.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("model unavailable: {0}")]
    ModelUnavailable(#[from] ModelError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("no output after {iterations} model replies")]
    LoopExhausted { iterations: usize },

    #[error("model call timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("end of input")]
    EndOfInput,
}

// ─────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing {what} (set {env_var})")]
    MissingCredential {
        what: &'static str,
        env_var: &'static str,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

// ─────────────────────────────────────────────
// Model endpoint
// ─────────────────────────────────────────────

/// Transport or response-shape failure talking to the model endpoint.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unreadable completion response: {0}")]
    InvalidResponse(String),

    #[error("completion contained no message content")]
    EmptyResponse,
}

// ─────────────────────────────────────────────
// Envelope protocol
// ─────────────────────────────────────────────

/// The model broke the JSON envelope contract.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProtocolError {
    #[error("reply is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("reply is not a JSON object")]
    NotAnObject,

    #[error("reply has no string `type` field")]
    MissingType,

    #[error("unknown envelope type `{0}`")]
    UnknownType(String),

    #[error("malformed `{kind}` envelope: {reason}")]
    Malformed { kind: String, reason: String },

    #[error("model may not send `{0}` envelopes")]
    UnexpectedEnvelope(&'static str),
}

// ─────────────────────────────────────────────
// Tools
// ─────────────────────────────────────────────

/// A tool invocation failed. Never fatal: the loop turns it into an
/// observation so the model can react.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("unknown tool `{name}`")]
    UnknownTool { name: String, available: Vec<String> },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("provider returned {status}")]
    Status { status: u16, body: Value },

    #[error("provider reported an error")]
    Provider { payload: Value },

    #[error("unreadable provider response: {0}")]
    InvalidResponse(String),

    #[error("tool timed out after {secs}s")]
    Timeout { secs: u64 },
}

impl ToolError {
    /// JSON body forwarded to the model inside an `observation` envelope.
    pub fn observation_payload(&self) -> Value {
        let detail = match self {
            ToolError::UnknownTool { name, available } => json!({
                "type": "unknown_tool",
                "info": format!("No tool named '{name}' is available"),
                "available": available,
            }),
            ToolError::InvalidInput(reason) => json!({
                "type": "invalid_input",
                "info": reason,
            }),
            ToolError::Request(reason) => json!({
                "type": "request_failed",
                "info": reason,
            }),
            ToolError::Status { status, body } => json!({
                "type": "http_status",
                "status": status,
                "body": body,
            }),
            ToolError::Provider { payload } => payload.clone(),
            ToolError::InvalidResponse(reason) => json!({
                "type": "invalid_response",
                "info": reason,
            }),
            ToolError::Timeout { secs } => json!({
                "type": "timeout",
                "info": format!("Tool did not respond within {secs}s"),
            }),
        };
        json!({ "error": detail })
    }
}
