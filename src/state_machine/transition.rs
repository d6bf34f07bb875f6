//! Pure state transition function
//!
//! `Idle --Submit--> InFlight --ReplyReceived|ExchangeFailed--> Idle`.
//! There is no cancelled state: every turn in flight resolves to a bot turn
//! or an error turn.

use super::{Effect, Event, WidgetContext, WidgetState};
use crate::protocol::RequestEnvelope;
use crate::session::SessionState;
use crate::transcript::ConversationTurn;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: WidgetState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: WidgetState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A reply is still pending; wait for it before sending another message")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Whitespace and stray byte-order marks around submitted text are dropped
fn trim_input(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
/// The session is read here (to build the request) and written only by the
/// executor when it applies [`Effect::UpdateSession`].
pub fn transition(
    state: &WidgetState,
    context: &WidgetContext,
    session: &SessionState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Submission
        // ============================================================

        // Idle + Submit (blank) -> Idle, nothing recorded
        (WidgetState::Idle, Event::Submit { text }) if trim_input(&text).is_empty() => {
            Ok(TransitionResult::new(WidgetState::Idle))
        }

        // Idle + Submit -> InFlight
        (WidgetState::Idle, Event::Submit { text }) => {
            let message = trim_input(&text).to_string();
            let envelope = RequestEnvelope::new(
                context.user_id,
                session.current().map(str::to_owned),
                message.clone(),
            );
            Ok(TransitionResult::new(WidgetState::InFlight {
                message: message.clone(),
            })
            .with_effect(Effect::append_user(message))
            .with_effect(Effect::ClearInput)
            .with_effect(Effect::DisableInput)
            .with_effect(Effect::SendRequest { envelope }))
        }

        // At most one turn in flight
        (WidgetState::InFlight { .. }, Event::Submit { .. }) => Err(TransitionError::Busy),

        // ============================================================
        // Resolution
        // ============================================================

        // InFlight + ReplyReceived -> Idle
        (WidgetState::InFlight { .. }, Event::ReplyReceived { reply }) => {
            let ended = reply.stop_chat;
            let mut result = TransitionResult::new(WidgetState::Idle)
                .with_effect(Effect::UpdateSession {
                    session_uuid: reply.session_uuid,
                })
                .with_effect(Effect::AppendTurn(ConversationTurn::bot(reply.answer)));
            if ended {
                result = result.with_effect(Effect::NotifyConversationEnded);
            }
            Ok(result.with_effects(restore_input()))
        }

        // InFlight + ExchangeFailed -> Idle with an error turn
        (WidgetState::InFlight { .. }, Event::ExchangeFailed { error }) => {
            Ok(TransitionResult::new(WidgetState::Idle)
                .with_effect(Effect::append_error(error.to_string()))
                .with_effects(restore_input()))
        }

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {state:?} with event {event:?}"
        ))),
    }
}

/// Runs on every resolution, success or failure
fn restore_input() -> [Effect; 2] {
    [Effect::EnableInput, Effect::FocusInput]
}
