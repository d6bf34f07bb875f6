//! Request and response envelopes

use super::error::{ExchangeError, GENERIC_BACKEND_ERROR};
use super::types::Answer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of every outgoing chat request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub user_id: i64,
    /// Serialized as `null` until the service has assigned a session
    pub session_uuid: Option<String>,
    pub message: String,
}

impl RequestEnvelope {
    pub fn new(user_id: i64, session_uuid: Option<String>, message: impl Into<String>) -> Self {
        Self {
            user_id,
            session_uuid,
            message: message.into(),
        }
    }
}

/// Response body fields as received. Every field is optional and untyped so
/// that truthiness can be judged the way the service's clients expect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub answer: Option<Value>,
    #[serde(default)]
    pub session_uuid: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    /// Error bodies produced by the service's HTTP framework use `detail`
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub stop_chat: Option<Value>,
}

impl ResponseEnvelope {
    /// Non-object bodies (arrays, strings, `null`) carry no fields
    pub fn from_value(body: Value) -> Self {
        if body.is_object() {
            serde_json::from_value(body).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Human-readable failure reason, falling back to the generic message
    pub fn failure_message(&self) -> String {
        [&self.message, &self.detail]
            .into_iter()
            .flatten()
            .find_map(|v| v.as_str().filter(|s| !s.is_empty()))
            .unwrap_or(GENERIC_BACKEND_ERROR)
            .to_string()
    }

    /// Session identifier, only when a non-empty string
    pub fn session_uuid(&self) -> Option<&str> {
        self.session_uuid
            .as_ref()
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// A successful reply, ready to be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub answer: Answer,
    pub session_uuid: Option<String>,
    /// The service considers the conversation finished
    pub stop_chat: bool,
}

impl ChatReply {
    pub fn new(answer: impl Into<Answer>, session_uuid: Option<String>) -> Self {
        Self {
            answer: answer.into(),
            session_uuid,
            stop_chat: false,
        }
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy; arrays and
/// objects (even empty ones) are truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Turn an HTTP status and raw body into a reply or an exchange error
pub fn interpret_response(status: u16, body: &str) -> Result<ChatReply, ExchangeError> {
    let value: Value = serde_json::from_str(body).map_err(|_| ExchangeError::Decode {
        status,
        raw_body: body.to_string(),
    })?;

    let mut envelope = ResponseEnvelope::from_value(value);
    let success = (200..300).contains(&status);
    let answer = envelope.answer.take().filter(is_truthy);

    let Some(answer) = answer.filter(|_| success) else {
        return Err(ExchangeError::backend(status, envelope.failure_message()));
    };

    Ok(ChatReply {
        answer: Answer::from_value(answer),
        session_uuid: envelope.session_uuid().map(str::to_owned),
        stop_chat: envelope.stop_chat.as_ref().is_some_and(is_truthy),
    })
}
