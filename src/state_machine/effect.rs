//! Effects produced by state transitions

use crate::protocol::RequestEnvelope;
use crate::transcript::ConversationTurn;

/// Effects to be executed after state transition, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Render and append a turn to the transcript
    AppendTurn(ConversationTurn),

    /// Empty the input control
    ClearInput,

    DisableInput,

    EnableInput,

    /// Return keyboard focus to the input control
    FocusInput,

    /// Start the network exchange (runs in the background)
    SendRequest { envelope: RequestEnvelope },

    /// Carry the reply's session identifier into the session state
    UpdateSession { session_uuid: Option<String> },

    /// The service marked the conversation as finished
    NotifyConversationEnded,
}

impl Effect {
    pub fn append_user(text: impl Into<String>) -> Self {
        Effect::AppendTurn(ConversationTurn::user(text))
    }

    pub fn append_error(message: impl Into<String>) -> Self {
        Effect::AppendTurn(ConversationTurn::error(message))
    }
}
