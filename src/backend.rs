//! Answering service abstraction
//!
//! The controller only ever talks to a [`ChatBackend`]; the HTTP client is one
//! implementation and the test mocks are others.

mod http;

pub use http::HttpChatBackend;

use crate::protocol::{ChatReply, ExchangeError, RequestEnvelope};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// One request/response exchange with the answering service
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send a message and interpret the response
    async fn exchange(&self, request: &RequestEnvelope) -> Result<ChatReply, ExchangeError>;

    /// Where requests go, for logging
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for Arc<T> {
    async fn exchange(&self, request: &RequestEnvelope) -> Result<ChatReply, ExchangeError> {
        (**self).exchange(request).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Wrapper that logs every exchange
pub struct LoggingBackend {
    inner: Arc<dyn ChatBackend>,
    endpoint: String,
}

impl LoggingBackend {
    pub fn new(inner: Arc<dyn ChatBackend>) -> Self {
        let endpoint = inner.endpoint().to_string();
        Self { inner, endpoint }
    }
}

#[async_trait]
impl ChatBackend for LoggingBackend {
    async fn exchange(&self, request: &RequestEnvelope) -> Result<ChatReply, ExchangeError> {
        let start = Instant::now();
        let result = self.inner.exchange(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    items = reply.answer.items().len(),
                    has_session = reply.session_uuid.is_some(),
                    stop_chat = reply.stop_chat,
                    "Chat exchange completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind(),
                    status = ?e.status(),
                    error = %e,
                    "Chat exchange failed"
                );
                if let Some(raw) = e.raw_body() {
                    tracing::error!(raw_body = %raw, "Raw response body");
                }
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
