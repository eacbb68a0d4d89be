//! The JSON envelope protocol exchanged in-band between host and model.
//!
//! Every message after the system prompt carries one envelope as its content:
//!
//! ```text
//! {"type": "user", "content": "What is the weather of Surat?"}
//! {"type": "plan", "plan": "I will call getWeatherDetails with Surat"}
//! {"type": "action", "function": "getWeatherDetails", "input": "Surat"}
//! {"type": "observation", "observation": { ... }}
//! {"type": "output", "output": "It's 32°C and sunny in Surat."}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// Discriminants understood by [`AgentEnvelope::parse`].
const KINDS: &[&str] = &["user", "plan", "action", "observation", "output"];

/// One protocol message, tagged by its `type` field.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AgentEnvelope {
    User {
        #[serde(alias = "user")]
        content: String,
    },
    Plan {
        plan: String,
    },
    Action {
        function: String,
        input: String,
    },
    Observation {
        observation: Value,
    },
    Output {
        output: String,
    },
}

/// A tool invocation requested by an `action` envelope.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToolCall {
    pub function: String,
    pub input: String,
}

impl AgentEnvelope {
    pub fn user(content: impl Into<String>) -> Self {
        AgentEnvelope::User {
            content: content.into(),
        }
    }

    pub fn observation(observation: Value) -> Self {
        AgentEnvelope::Observation { observation }
    }

    /// Parse a raw model reply.
    ///
    /// Distinguishes invalid JSON, a missing or unknown `type`, and a known
    /// `type` whose fields are missing or mistyped. An `action` must name a
    /// non-empty function and carry a string input.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(raw.trim())
            .map_err(|e| ProtocolError::InvalidJson(e.to_string()))?;

        let kind = value
            .as_object()
            .ok_or(ProtocolError::NotAnObject)?
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingType)?
            .to_string();

        if !KINDS.contains(&kind.as_str()) {
            return Err(ProtocolError::UnknownType(kind));
        }

        let envelope: AgentEnvelope =
            serde_json::from_value(value).map_err(|e| ProtocolError::Malformed {
                kind: kind.clone(),
                reason: e.to_string(),
            })?;

        if let AgentEnvelope::Action { function, .. } = &envelope {
            if function.trim().is_empty() {
                return Err(ProtocolError::Malformed {
                    kind,
                    reason: "`function` must not be empty".into(),
                });
            }
        }

        Ok(envelope)
    }

    /// The `type` discriminant.
    pub fn kind(&self) -> &'static str {
        match self {
            AgentEnvelope::User { .. } => "user",
            AgentEnvelope::Plan { .. } => "plan",
            AgentEnvelope::Action { .. } => "action",
            AgentEnvelope::Observation { .. } => "observation",
            AgentEnvelope::Output { .. } => "output",
        }
    }

    /// Compact JSON form, as placed into message content.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_action() {
        let env = AgentEnvelope::parse(
            r#"{"type":"action","function":"getWeatherDetails","input":"Surat"}"#,
        )
        .unwrap();
        assert_eq!(
            env,
            AgentEnvelope::Action {
                function: "getWeatherDetails".into(),
                input: "Surat".into(),
            }
        );
        assert_eq!(env.kind(), "action");
    }

    #[test]
    fn parses_output_verbatim() {
        let env =
            AgentEnvelope::parse(r#"{"type":"output","output":"It's 32°C and sunny in Surat."}"#)
                .unwrap();
        assert_eq!(
            env,
            AgentEnvelope::Output {
                output: "It's 32°C and sunny in Surat.".into()
            }
        );
    }

    #[test]
    fn tolerates_surrounding_whitespace_and_extra_fields() {
        let env = AgentEnvelope::parse("\n  {\"type\":\"plan\",\"plan\":\"look it up\",\"step\":1}\n")
            .unwrap();
        assert_eq!(env.kind(), "plan");
    }

    #[test]
    fn user_accepts_legacy_key() {
        let env = AgentEnvelope::parse(r#"{"type":"user","user":"hi"}"#).unwrap();
        assert_eq!(env, AgentEnvelope::user("hi"));
    }

    #[test]
    fn rejects_non_json() {
        let err = AgentEnvelope::parse("Sure! The weather is sunny.").unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidJson(_)));
    }

    #[test]
    fn rejects_non_object() {
        assert_eq!(
            AgentEnvelope::parse(r#"["action"]"#).unwrap_err(),
            ProtocolError::NotAnObject
        );
    }

    #[test]
    fn rejects_missing_type() {
        assert_eq!(
            AgentEnvelope::parse(r#"{"output":"hello"}"#).unwrap_err(),
            ProtocolError::MissingType
        );
        assert_eq!(
            AgentEnvelope::parse(r#"{"type":7,"output":"hello"}"#).unwrap_err(),
            ProtocolError::MissingType
        );
    }

    #[test]
    fn rejects_unknown_type() {
        assert_eq!(
            AgentEnvelope::parse(r#"{"type":"thought","thought":"hmm"}"#).unwrap_err(),
            ProtocolError::UnknownType("thought".into())
        );
    }

    #[test]
    fn rejects_action_without_input() {
        let err = AgentEnvelope::parse(r#"{"type":"action","function":"getWeatherDetails"}"#)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed { ref kind, .. } if kind == "action"));
    }

    #[test]
    fn rejects_action_with_non_string_input() {
        let err = AgentEnvelope::parse(
            r#"{"type":"action","function":"getWeatherDetails","input":{"city":"Surat"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed { .. }));
    }

    #[test]
    fn rejects_action_with_blank_function() {
        let err = AgentEnvelope::parse(r#"{"type":"action","function":"  ","input":"Surat"}"#)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed { ref reason, .. } if reason.contains("function")));
    }

    #[test]
    fn observation_serializes_with_type_tag() {
        let env = AgentEnvelope::observation(json!({"current": {"temperature": 32}}));
        let value: Value = serde_json::from_str(&env.to_json()).unwrap();
        assert_eq!(value["type"], "observation");
        assert_eq!(value["observation"]["current"]["temperature"], 32);
    }

    #[test]
    fn user_serializes_content_key() {
        let value: Value =
            serde_json::from_str(&AgentEnvelope::user("What is the weather of Surat?").to_json())
                .unwrap();
        assert_eq!(
            value,
            json!({"type": "user", "content": "What is the weather of Surat?"})
        );
    }
}
