//! Agent loop — the PLAN / ACTION / OBSERVATION / OUTPUT state machine.
//!
//! One call to [`AgentLoop::run_turn`] drives the model from a user message
//! to a final `output` envelope:
//!
//! ```text
//! AwaitingModelReply ──plan──▶ Planning ──────────────────────▶ AwaitingModelReply
//!        │
//!        ├──action──▶ ActingOnTool ──▶ ObservingResult ────────▶ AwaitingModelReply
//!        │
//!        └──output──▶ Done(text)
//! ```
//!
//! Tool failures (including unknown tools and timeouts) become error
//! observations the model can react to. Malformed replies, transport failures
//! and iteration exhaustion abort the turn.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use stratus_core::config::AgentDefaults;
use stratus_core::envelope::{AgentEnvelope, ToolCall};
use stratus_core::error::{AgentError, ProtocolError, Result, ToolError};
use stratus_core::types::Message;
use stratus_core::utils::truncate_string;
use stratus_providers::traits::{LlmProvider, LlmRequestConfig};

use crate::cache::ResponseCache;
use crate::context::ContextBuilder;
use crate::session::{Session, ToolCacheKey};
use crate::tools::ToolRegistry;

/// Default maximum model replies per user turn.
const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Characters of a raw reply kept in log lines.
const LOG_PREVIEW_CHARS: usize = 200;

// ─────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────

/// Tunables for the loop.
#[derive(Clone, Debug)]
pub struct LoopSettings {
    /// Model to use (provider default if `None`).
    pub model: Option<String>,
    /// Max model replies per user turn.
    pub max_iterations: usize,
    /// Bound on a single model query.
    pub model_timeout: Duration,
    /// Bound on a single tool invocation.
    pub tool_timeout: Duration,
    /// Temperature, max_tokens.
    pub request: LlmRequestConfig,
    /// Name used in the system prompt.
    pub agent_name: String,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            model: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            model_timeout: Duration::from_secs(120),
            tool_timeout: Duration::from_secs(30),
            request: LlmRequestConfig::default(),
            agent_name: "Stratus".into(),
        }
    }
}

impl From<&AgentDefaults> for LoopSettings {
    fn from(defaults: &AgentDefaults) -> Self {
        Self {
            model: Some(defaults.model.clone()),
            max_iterations: defaults.max_iterations as usize,
            model_timeout: Duration::from_secs(defaults.model_timeout_secs),
            tool_timeout: Duration::from_secs(defaults.tool_timeout_secs),
            request: LlmRequestConfig {
                max_tokens: defaults.max_tokens,
                temperature: defaults.temperature,
            },
            ..Self::default()
        }
    }
}

// ─────────────────────────────────────────────
// State machine
// ─────────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum TurnState {
    AwaitingModelReply,
    Planning,
    ActingOnTool(ToolCall),
    ObservingResult(Value),
    Done(String),
}

/// Classify a raw model reply into the state it moves the turn to.
fn classify(raw: &str) -> std::result::Result<TurnState, ProtocolError> {
    match AgentEnvelope::parse(raw)? {
        AgentEnvelope::Plan { plan } => {
            debug!(plan = %truncate_string(&plan, LOG_PREVIEW_CHARS), "model planned");
            Ok(TurnState::Planning)
        }
        AgentEnvelope::Action { function, input } => {
            Ok(TurnState::ActingOnTool(ToolCall { function, input }))
        }
        AgentEnvelope::Output { output } => Ok(TurnState::Done(output)),
        other @ (AgentEnvelope::User { .. } | AgentEnvelope::Observation { .. }) => {
            Err(ProtocolError::UnexpectedEnvelope(other.kind()))
        }
    }
}

// ─────────────────────────────────────────────
// AgentLoop
// ─────────────────────────────────────────────

/// Drives the model through tool calls until it answers.
///
/// Holds only shared, read-only pieces (provider, tools, settings); all
/// per-conversation state lives in the [`Session`] passed to each turn.
pub struct AgentLoop {
    /// LLM provider.
    provider: Arc<dyn LlmProvider>,
    /// Tool registry.
    tools: ToolRegistry,
    /// Model to use.
    model: String,
    /// Loop tunables.
    settings: LoopSettings,
    /// Prompt every new session starts with.
    system_prompt: String,
}

impl AgentLoop {
    /// Create a new agent loop.
    pub fn new(provider: Arc<dyn LlmProvider>, tools: ToolRegistry, settings: LoopSettings) -> Self {
        let model = settings
            .model
            .clone()
            .unwrap_or_else(|| provider.default_model().to_string());
        let system_prompt =
            ContextBuilder::new(settings.agent_name.clone()).build_system_prompt(&tools);

        info!(
            model = %model,
            provider = provider.display_name(),
            tools = tools.len(),
            max_iterations = settings.max_iterations,
            "agent loop initialized"
        );

        Self {
            provider,
            tools,
            model,
            settings,
            system_prompt,
        }
    }

    /// Start a fresh session with its own history and cache.
    pub fn new_session(&self, id: impl Into<String>) -> Session {
        Session::new(id, self.system_prompt.clone())
    }

    /// Run one user turn to completion and return the model's `output` text.
    pub async fn run_turn(&self, session: &mut Session, user_text: &str) -> Result<String> {
        session.conversation.push_user_input(user_text);

        let mut iterations = 0;
        let mut state = TurnState::AwaitingModelReply;

        loop {
            state = match state {
                TurnState::AwaitingModelReply => {
                    if iterations >= self.settings.max_iterations {
                        warn!(session = session.id(), iterations, "no output before iteration cap");
                        return Err(AgentError::LoopExhausted { iterations });
                    }
                    iterations += 1;
                    debug!(session = session.id(), iteration = iterations, "LLM call");

                    let raw = self.query_model(session.conversation.messages()).await?;
                    session.conversation.push_assistant_reply(&raw);

                    classify(&raw).map_err(|e| {
                        warn!(
                            error = %e,
                            reply = %truncate_string(&raw, LOG_PREVIEW_CHARS),
                            "model broke the envelope protocol"
                        );
                        AgentError::Protocol(e)
                    })?
                }
                TurnState::Planning => TurnState::AwaitingModelReply,
                TurnState::ActingOnTool(call) => {
                    info!(
                        tool = %call.function,
                        input = %truncate_string(&call.input, LOG_PREVIEW_CHARS),
                        iteration = iterations,
                        "executing tool call"
                    );
                    TurnState::ObservingResult(self.dispatch(&mut session.cache, &call).await)
                }
                TurnState::ObservingResult(observation) => {
                    session.conversation.push_observation(observation);
                    TurnState::AwaitingModelReply
                }
                TurnState::Done(output) => {
                    debug!(session = session.id(), iterations, "turn complete");
                    return Ok(output);
                }
            };
        }
    }

    /// Query the model with the full history, bounded by the model timeout.
    async fn query_model(&self, messages: &[Message]) -> Result<String> {
        let call = self
            .provider
            .complete(messages, &self.model, &self.settings.request);

        match tokio::time::timeout(self.settings.model_timeout, call).await {
            Ok(Ok(raw)) => Ok(raw),
            Ok(Err(e)) => {
                error!(provider = self.provider.display_name(), error = %e, "model call failed");
                Err(AgentError::ModelUnavailable(e))
            }
            Err(_) => {
                error!(provider = self.provider.display_name(), "model call timed out");
                Err(AgentError::Timeout {
                    secs: self.settings.model_timeout.as_secs(),
                })
            }
        }
    }

    /// Resolve and invoke a tool through the session cache.
    ///
    /// Always yields an observation: the tool's result, or the error payload
    /// of whatever went wrong.
    async fn dispatch(
        &self,
        cache: &mut ResponseCache<ToolCacheKey, Value>,
        call: &ToolCall,
    ) -> Value {
        let tool = match self.tools.resolve(&call.function) {
            Ok(tool) => tool,
            Err(e) => {
                warn!(tool = %call.function, "model requested an unknown tool");
                return e.observation_payload();
            }
        };

        let timeout = self.settings.tool_timeout;
        let hits_before = cache.stats().hits;
        let key = (call.function.clone(), call.input.clone());

        let result = cache
            .get_or_compute(key, || async {
                match tokio::time::timeout(timeout, tool.invoke(&call.input)).await {
                    Ok(result) => result,
                    Err(_) => Err(ToolError::Timeout {
                        secs: timeout.as_secs(),
                    }),
                }
            })
            .await;

        if cache.stats().hits > hits_before {
            debug!(tool = %call.function, "cache hit");
        }

        match result {
            Ok(value) => value,
            Err(e) => {
                warn!(tool = %call.function, error = %e, "tool execution failed");
                e.observation_payload()
            }
        }
    }

    /// Get a reference to the tool registry.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The system prompt new sessions start with.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
