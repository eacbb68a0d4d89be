//! Stratus core — message types, the JSON envelope protocol, the error
//! taxonomy, and configuration.

pub mod config;
pub mod envelope;
pub mod error;
pub mod types;
pub mod utils;

pub use envelope::{AgentEnvelope, ToolCall};
pub use error::{AgentError, ConfigError, ModelError, ProtocolError, ToolError};
pub use types::{Message, Role};
