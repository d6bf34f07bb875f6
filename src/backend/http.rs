//! HTTP answering service client

use super::ChatBackend;
use crate::protocol::{interpret_response, ChatReply, ExchangeError, RequestEnvelope};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// POSTs the request envelope as JSON to a single chat endpoint
pub struct HttpChatBackend {
    client: Client,
    endpoint: String,
}

impl HttpChatBackend {
    /// `timeout` of `None` waits for the service indefinitely
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn exchange(&self, request: &RequestEnvelope) -> Result<ChatReply, ExchangeError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExchangeError::transport(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    ExchangeError::transport(format!("Connection failed: {e}"))
                } else {
                    ExchangeError::transport(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::transport(format!("Failed to read response: {e}")))?;

        interpret_response(status.as_u16(), &body)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
