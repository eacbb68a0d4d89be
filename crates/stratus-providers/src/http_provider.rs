//! HTTP provider for OpenAI-compatible chat completion APIs in JSON mode.
//!
//! Talks directly to `{api_base}/chat/completions` with `reqwest`, always
//! setting `response_format: {"type": "json_object"}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, error, warn};

use stratus_core::config::ProviderConfig;
use stratus_core::error::ModelError;
use stratus_core::types::{ChatCompletionRequest, ChatCompletionResponse, Message, ResponseFormat};

use crate::traits::{LlmProvider, LlmRequestConfig};

/// Used when the config does not set `apiBase`.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Per-call bound assumed by [`HttpProvider::new`].
const DEFAULT_CALL_BOUND: Duration = Duration::from_secs(120);

/// Added to the caller's per-call bound to get the transport timeout, so the
/// caller's bound always fires first.
pub const TRANSPORT_GRACE: Duration = Duration::from_secs(10);

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// A JSON-mode LLM provider that talks to any OpenAI-compatible HTTP API.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    /// Default model for this provider instance.
    default_model: String,
    /// Extra headers to send with each request.
    extra_headers: HeaderMap,
    /// reqwest client timeout.
    http_timeout: Duration,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl HttpProvider {
    /// Create a new HttpProvider.
    ///
    /// # Arguments
    /// * `config`  — User's config (api_key, api_base, extra_headers)
    /// * `model`   — The default model to use
    pub fn new(config: &ProviderConfig, model: &str) -> Result<Self, ModelError> {
        Self::with_call_bound(config, model, DEFAULT_CALL_BOUND)
    }

    /// Create a provider for a caller that bounds each call by `call_bound`.
    ///
    /// The transport timeout is `call_bound + TRANSPORT_GRACE`.
    pub fn with_call_bound(
        config: &ProviderConfig,
        model: &str,
        call_bound: Duration,
    ) -> Result<Self, ModelError> {
        Self::build(config, model, call_bound + TRANSPORT_GRACE)
    }

    fn build(
        config: &ProviderConfig,
        model: &str,
        http_timeout: Duration,
    ) -> Result<Self, ModelError> {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let mut extra_headers = HeaderMap::new();
        if let Some(ref headers) = config.extra_headers {
            for (key, value) in headers {
                if let (Ok(name), Ok(val)) = (
                    HeaderName::from_bytes(key.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    extra_headers.insert(name, val);
                } else {
                    warn!("Invalid header: {}", key);
                }
            }
        }

        let client = reqwest::Client::builder()
            .timeout(http_timeout)
            .build()
            .map_err(|e| ModelError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(HttpProvider {
            client,
            api_base,
            api_key: config.api_key.clone(),
            default_model: model.to_string(),
            extra_headers,
            http_timeout,
        })
    }

    /// The transport timeout applied to every request.
    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl LlmProvider for HttpProvider {
    async fn complete(
        &self,
        messages: &[Message],
        model: &str,
        config: &LlmRequestConfig,
    ) -> Result<String, ModelError> {
        debug!(model = %model, messages = messages.len(), "Calling LLM");

        let request_body = ChatCompletionRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            response_format: ResponseFormat::json_object(),
            max_tokens: config.max_tokens,
            temperature: Some(config.temperature),
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .headers(self.extra_headers.clone())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request failed");
                ModelError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(status = %status, body = %body, "API error");
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to parse LLM response");
                ModelError::InvalidResponse(e.to_string())
            })?;

        if let Some(usage) = &completion.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "LLM response received"
            );
        }

        completion.into_content().ok_or(ModelError::EmptyResponse)
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn display_name(&self) -> &str {
        "OpenAI-compatible"
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(api_key: &str, api_base: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            api_key: api_key.to_string(),
            api_base: api_base.map(String::from),
            extra_headers: None,
        }
    }

    fn completion(content: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-test",
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        })
    }

    // ── Unit tests ──

    #[test]
    fn test_completions_url_trailing_slash() {
        let config = make_config("key", Some("https://api.openai.com/v1/"));
        let provider = HttpProvider::new(&config, "gpt-4o-mini").unwrap();
        assert_eq!(
            provider.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_default_api_base() {
        let provider = HttpProvider::new(&make_config("key", None), "gpt-4o-mini").unwrap();
        assert_eq!(provider.api_base, DEFAULT_API_BASE);
        assert_eq!(provider.default_model(), "gpt-4o-mini");
    }

    #[test]
    fn test_extra_headers() {
        let mut headers = HashMap::new();
        headers.insert("OpenAI-Organization".to_string(), "org-123".to_string());
        let config = ProviderConfig {
            api_key: "key".to_string(),
            api_base: None,
            extra_headers: Some(headers),
        };
        let provider = HttpProvider::new(&config, "gpt-4o-mini").unwrap();
        assert!(provider.extra_headers.contains_key("openai-organization"));
    }

    // ── Integration tests with mock server ──

    #[tokio::test]
    async fn test_complete_requests_json_mode() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key-123"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "response_format": { "type": "json_object" },
                "messages": [
                    { "role": "system", "content": "You are Stratus." },
                    { "role": "developer", "content": "{\"type\":\"observation\",\"observation\":{}}" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                serde_json::json!("{\"type\":\"output\",\"output\":\"hi\"}"),
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider =
            HttpProvider::new(&make_config("test-key-123", Some(&mock_server.uri())), "gpt-4o-mini")
                .unwrap();

        let messages = vec![
            Message::system("You are Stratus."),
            Message::developer(r#"{"type":"observation","observation":{}}"#),
        ];
        let content = provider
            .complete(&messages, "gpt-4o-mini", &LlmRequestConfig::default())
            .await
            .unwrap();

        assert_eq!(content, r#"{"type":"output","output":"hi"}"#);
    }

    #[tokio::test]
    async fn test_complete_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
            })))
            .mount(&mock_server)
            .await;

        let provider =
            HttpProvider::new(&make_config("bad", Some(&mock_server.uri())), "gpt-4o-mini").unwrap();

        let err = provider
            .complete(&[Message::user("Hello")], "gpt-4o-mini", &LlmRequestConfig::default())
            .await
            .unwrap_err();

        match err {
            ModelError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Incorrect API key"));
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_network_error() {
        // Point to a port that's not listening
        let provider =
            HttpProvider::new(&make_config("key", Some("http://127.0.0.1:1")), "gpt-4o-mini")
                .unwrap();

        let err = provider
            .complete(&[Message::user("Hello")], "gpt-4o-mini", &LlmRequestConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ModelError::Transport(_)));
    }

    #[test]
    fn test_transport_timeout_outlasts_call_bound() {
        let bound = Duration::from_secs(120);
        let provider =
            HttpProvider::with_call_bound(&make_config("key", None), "gpt-4o-mini", bound).unwrap();
        assert_eq!(provider.http_timeout(), bound + TRANSPORT_GRACE);
        assert!(provider.http_timeout() > bound);

        let default = HttpProvider::new(&make_config("key", None), "gpt-4o-mini").unwrap();
        assert!(default.http_timeout() > DEFAULT_CALL_BOUND);
    }

    #[tokio::test]
    async fn test_complete_transport_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion(serde_json::json!("{}")))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let provider = HttpProvider::build(
            &make_config("key", Some(&mock_server.uri())),
            "gpt-4o-mini",
            Duration::from_millis(50),
        )
        .unwrap();

        let err = provider
            .complete(&[Message::user("Hello")], "gpt-4o-mini", &LlmRequestConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ModelError::Transport(_)));
    }

    #[tokio::test]
    async fn test_complete_null_content() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion(serde_json::Value::Null)),
            )
            .mount(&mock_server)
            .await;

        let provider =
            HttpProvider::new(&make_config("key", Some(&mock_server.uri())), "gpt-4o-mini").unwrap();

        let err = provider
            .complete(&[Message::user("Hello")], "gpt-4o-mini", &LlmRequestConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ModelError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_complete_unreadable_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&mock_server)
            .await;

        let provider =
            HttpProvider::new(&make_config("key", Some(&mock_server.uri())), "gpt-4o-mini").unwrap();

        let err = provider
            .complete(&[Message::user("Hello")], "gpt-4o-mini", &LlmRequestConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ModelError::InvalidResponse(_)));
    }
}
