//! LLM Provider trait — the model endpoint abstraction.
//!
//! The agent loop only needs one capability: send the message history, get
//! back a single JSON-encoded assistant message. `HttpProvider` in
//! `http_provider.rs` covers any OpenAI-compatible API.

use async_trait::async_trait;
use stratus_core::error::ModelError;
use stratus_core::types::Message;

/// Configuration passed to each LLM call.
#[derive(Clone, Debug)]
pub struct LlmRequestConfig {
    /// Maximum tokens to generate (`None` = endpoint default).
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for LlmRequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: None,
            temperature: 0.7,
        }
    }
}

/// Trait that all LLM providers must implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a JSON-mode chat completion request.
    ///
    /// # Arguments
    /// * `messages` — Conversation history in OpenAI format.
    /// * `model`    — Model identifier (e.g. `"gpt-4o-mini"`).
    /// * `config`   — Temperature, max_tokens.
    ///
    /// # Returns
    /// The raw content string of the assistant reply. Implementations must
    /// request JSON-object output from the endpoint; validating the envelope
    /// inside it is the caller's job.
    async fn complete(
        &self,
        messages: &[Message],
        model: &str,
        config: &LlmRequestConfig,
    ) -> Result<String, ModelError>;

    /// The default model for this provider instance.
    fn default_model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
