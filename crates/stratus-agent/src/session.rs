//! One conversation: its history and its tool-result cache.
//!
//! Sessions never share state. Two sessions in the same process asking about
//! the same city each make their own external call.

use serde_json::Value;

use crate::cache::ResponseCache;
use crate::conversation::ConversationState;

/// Cache key: `(tool name, raw input)`.
pub type ToolCacheKey = (String, String);

pub struct Session {
    id: String,
    pub conversation: ConversationState,
    pub cache: ResponseCache<ToolCacheKey, Value>,
}

impl Session {
    pub fn new(id: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            conversation: ConversationState::new(system_prompt),
            cache: ResponseCache::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}
