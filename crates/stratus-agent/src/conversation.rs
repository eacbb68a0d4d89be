//! Conversation state — the ordered message history fed to the model.
//!
//! Append-only: messages are never edited or removed, so the model always sees
//! every prior reply, including intermediate plans and replies that failed to
//! parse.

use serde_json::Value;

use stratus_core::envelope::AgentEnvelope;
use stratus_core::types::Message;

#[derive(Clone, Debug, Default)]
pub struct ConversationState {
    messages: Vec<Message>,
}

impl ConversationState {
    /// Start a history with the given system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append human input as a `user` envelope.
    pub fn push_user_input(&mut self, text: &str) {
        self.push(Message::user(AgentEnvelope::user(text).to_json()));
    }

    /// Append a model reply exactly as received.
    pub fn push_assistant_reply(&mut self, raw: &str) {
        self.push(Message::assistant(raw));
    }

    /// Append a tool result as an `observation` envelope from the developer role.
    pub fn push_observation(&mut self, observation: Value) {
        self.push(Message::developer(
            AgentEnvelope::observation(observation).to_json(),
        ));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
