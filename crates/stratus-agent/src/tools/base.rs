//! Tool trait — the capability interface every agent tool implements.

use async_trait::async_trait;
use serde_json::Value;

use stratus_core::error::ToolError;

// ─────────────────────────────────────────────
// Tool trait
// ─────────────────────────────────────────────

/// Every agent tool implements this trait.
///
/// The agent loop resolves tools via `name()`, lists them in the system
/// prompt via `signature()` + `description()`, and dispatches `action`
/// envelopes via `invoke()`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name used by the model in `action.function` (e.g. `"getWeatherDetails"`).
    fn name(&self) -> &str;

    /// Human-readable description shown to the model.
    fn description(&self) -> &str;

    /// Call signature shown in the tool catalogue.
    fn signature(&self) -> String {
        format!("function {}(input: string): JSON", self.name())
    }

    /// Run the tool on the raw `action.input` string.
    ///
    /// On failure, return a `ToolError`; the loop forwards its
    /// `observation_payload()` to the model.
    async fn invoke(&self, input: &str) -> Result<Value, ToolError>;
}
