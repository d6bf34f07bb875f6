//! Exchange error types

use thiserror::Error;

/// Fallback text when a failed response carries no usable message
pub const GENERIC_BACKEND_ERROR: &str = "Backend error.";

/// Shown to the user when the response body is not JSON
pub const DECODE_FAILURE_MESSAGE: &str =
    "Failed to parse backend response as JSON. See the logs for details.";

/// Failure of one request/response exchange with the answering service.
///
/// `Display` is the user-facing text of the resulting error turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// The request never produced a response (unreachable host, timeout, ...)
    #[error("{message}")]
    Transport { message: String },

    /// The response body was not valid JSON. `raw_body` is for diagnostics only.
    #[error("{}", DECODE_FAILURE_MESSAGE)]
    Decode { status: u16, raw_body: String },

    /// Well-formed response that reports failure or lacks an answer
    #[error("{message}")]
    Backend { status: u16, message: String },
}

impl ExchangeError {
    pub fn transport(message: impl Into<String>) -> Self {
        ExchangeError::Transport {
            message: message.into(),
        }
    }

    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        ExchangeError::Backend {
            status,
            message: message.into(),
        }
    }

    /// Short classification for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            ExchangeError::Transport { .. } => "transport",
            ExchangeError::Decode { .. } => "decode",
            ExchangeError::Backend { .. } => "backend",
        }
    }

    /// HTTP status, when a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ExchangeError::Transport { .. } => None,
            ExchangeError::Decode { status, .. } | ExchangeError::Backend { status, .. } => {
                Some(*status)
            }
        }
    }

    /// The undecodable body, kept out of band
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            ExchangeError::Decode { raw_body, .. } => Some(raw_body),
            _ => None,
        }
    }
}
