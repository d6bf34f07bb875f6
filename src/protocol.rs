//! Wire contract with the answering service
//!
//! Requests go out as [`RequestEnvelope`]; response bodies are interpreted by
//! [`interpret_response`] into a [`ChatReply`] or an [`ExchangeError`].

mod envelope;
mod error;
mod types;

pub use envelope::{interpret_response, is_truthy, ChatReply, RequestEnvelope, ResponseEnvelope};
pub use error::{ExchangeError, DECODE_FAILURE_MESSAGE, GENERIC_BACKEND_ERROR};
pub use types::{Answer, Card, CardKind, ReplyItem, SelectionOption};
