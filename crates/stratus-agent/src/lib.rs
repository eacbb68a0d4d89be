//! Stratus Agent — envelope loop, tools, cache, and context builder.
//!
//! This crate contains:
//! - **tools**: Tool trait, registry, and the weather tool
//! - **context**: System prompt construction
//! - **conversation** / **cache** / **session**: per-session state
//! - **agent_loop**: The PLAN → ACTION → OBSERVATION → OUTPUT loop

pub mod agent_loop;
pub mod cache;
pub mod context;
pub mod conversation;
pub mod session;
pub mod tools;

pub use agent_loop::{AgentLoop, LoopSettings};
pub use cache::ResponseCache;
pub use context::ContextBuilder;
pub use conversation::ConversationState;
pub use session::Session;
pub use tools::{Tool, ToolRegistry, WeatherTool};
