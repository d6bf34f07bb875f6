//! Events that drive the submission controller

use crate::protocol::{ChatReply, ExchangeError};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// The form was submitted, directly or synthesized by Enter or an option
    /// button. `text` is the untrimmed input value.
    Submit { text: String },

    /// The service answered successfully
    ReplyReceived { reply: ChatReply },

    /// The exchange failed at any stage
    ExchangeFailed { error: ExchangeError },
}

impl Event {
    pub fn submit(text: impl Into<String>) -> Self {
        Event::Submit { text: text.into() }
    }
}
