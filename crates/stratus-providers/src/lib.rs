//! LLM provider layer for Stratus.
//!
//! # Architecture
//!
//! - [`traits::LlmProvider`] — trait that all providers implement
//! - [`http_provider::HttpProvider`] — OpenAI-compatible JSON-mode HTTP client

pub mod http_provider;
pub mod traits;

pub use http_provider::HttpProvider;
pub use traits::{LlmProvider, LlmRequestConfig};
