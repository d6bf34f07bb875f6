//! Widget runtime executor

use super::{Command, InputControl, Key, WidgetNotice};
use crate::backend::ChatBackend;
use crate::protocol::{ExchangeError, RequestEnvelope};
use crate::session::SessionState;
use crate::state_machine::{transition, Effect, Event, TransitionError, WidgetContext, WidgetState};
use crate::transcript::{ControlId, ConversationTurn, Transcript};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Owns the state of one widget instance and executes effects
pub struct ChatRuntime<B>
where
    B: ChatBackend + 'static,
{
    context: WidgetContext,
    state: WidgetState,
    session: SessionState,
    transcript: Transcript,
    input: InputControl,
    backend: Arc<B>,
    initial_message: Option<String>,
    command_rx: mpsc::Receiver<Command>,
    /// Resolutions of background exchanges
    outcome_tx: mpsc::Sender<Event>,
    outcome_rx: mpsc::Receiver<Event>,
    notice_tx: broadcast::Sender<WidgetNotice>,
}

impl<B> ChatRuntime<B>
where
    B: ChatBackend + 'static,
{
    pub fn new(
        context: WidgetContext,
        backend: B,
        command_rx: mpsc::Receiver<Command>,
        notice_tx: broadcast::Sender<WidgetNotice>,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(4);
        Self {
            context,
            state: WidgetState::Idle,
            session: SessionState::new(),
            transcript: Transcript::new(),
            input: InputControl::default(),
            backend: Arc::new(backend),
            initial_message: None,
            command_rx,
            outcome_tx,
            outcome_rx,
            notice_tx,
        }
    }

    /// Greeting appended as the first bot turn when the runtime starts
    pub fn with_initial_message(mut self, message: Option<String>) -> Self {
        self.initial_message = message.filter(|m| !m.trim().is_empty());
        self
    }

    pub async fn run(mut self) -> Transcript {
        tracing::info!(
            user_id = self.context.user_id,
            endpoint = %self.backend.endpoint(),
            "Starting widget runtime"
        );

        if let Some(greeting) = self.initial_message.take() {
            self.append_turn(ConversationTurn::greeting(greeting));
        }

        let mut commands_open = true;
        loop {
            tokio::select! {
                command = self.command_rx.recv(), if commands_open => {
                    if let Some(command) = command {
                        self.handle_command(command);
                    } else {
                        tracing::debug!("Command channel closed");
                        commands_open = false;
                    }
                }
                Some(event) = self.outcome_rx.recv() => self.process_event(event),
                else => break,
            }

            // A pending turn still resolves after the host hangs up
            if !commands_open && !self.state.is_in_flight() {
                break;
            }
        }

        tracing::info!(turns = self.transcript.len(), "Widget runtime stopped");
        self.transcript
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetInput(value) => {
                if self.input.disabled {
                    tracing::debug!("Input is disabled, ignoring typed text");
                } else {
                    self.input.value = value;
                }
            }
            Command::KeyDown {
                key: Key::Enter,
                shift: false,
            }
            | Command::SubmitForm => self.submit_form(),
            Command::KeyDown {
                key: Key::Enter,
                shift: true,
            } => {
                if !self.input.disabled {
                    self.input.value.push('\n');
                }
            }
            Command::KeyDown { key: Key::Other, .. } => {}
            Command::ActivateOption(id) => self.activate_option(id),
        }
    }

    fn submit_form(&mut self) {
        let text = self.input.value.clone();
        self.process_event(Event::Submit { text });
    }

    /// Option buttons re-enter the submission path with their raw payload
    fn activate_option(&mut self, id: ControlId) {
        // Guarded here so a rejected click never overwrites the input
        if self.state.is_in_flight() {
            self.reject(&TransitionError::Busy.to_string());
            return;
        }
        let Some(payload) = self.transcript.payload_for(id) else {
            self.reject(&format!("Unknown option control {id}"));
            return;
        };
        tracing::info!(control = %id, "Option activated");
        self.input.value = payload.to_string();
        self.submit_form();
    }

    fn process_event(&mut self, event: Event) {
        let result = match transition(&self.state, &self.context, &self.session, event) {
            Ok(r) => r,
            Err(TransitionError::Busy) => {
                self.reject(&TransitionError::Busy.to_string());
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "Dropping event");
                return;
            }
        };

        self.state = result.new_state;
        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AppendTurn(turn) => self.append_turn(turn),
            Effect::ClearInput => self.input.value.clear(),
            Effect::DisableInput => {
                self.input.disabled = true;
                self.input.focused = false;
                self.notify_input();
            }
            Effect::EnableInput => {
                self.input.disabled = false;
                self.notify_input();
            }
            Effect::FocusInput => {
                self.input.focused = true;
                self.notify_input();
            }
            Effect::SendRequest { envelope } => self.send_request(envelope),
            Effect::UpdateSession { session_uuid } => {
                self.session.update(session_uuid.as_deref());
            }
            Effect::NotifyConversationEnded => {
                tracing::info!("Service ended the conversation");
                self.notify(WidgetNotice::ConversationEnded);
            }
        }
    }

    fn append_turn(&mut self, turn: ConversationTurn) {
        let appended = self.transcript.append(turn);
        let notice = WidgetNotice::TurnAppended {
            index: appended.index,
            html: appended.to_html(),
            controls: appended.controls.clone(),
        };
        self.notify(notice);
    }

    /// Spawn the exchange; its outcome comes back through `outcome_tx`
    fn send_request(&mut self, envelope: RequestEnvelope) {
        tracing::info!(
            has_session = envelope.session_uuid.is_some(),
            "Sending message (background)"
        );
        self.notify(WidgetNotice::RequestSent {
            envelope: envelope.clone(),
        });

        let backend = self.backend.clone();
        let outcome_tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            let exchange = tokio::spawn(async move { backend.exchange(&envelope).await });

            let event = match exchange.await {
                Ok(Ok(reply)) => Event::ReplyReceived { reply },
                Ok(Err(error)) => Event::ExchangeFailed { error },
                Err(e) => {
                    tracing::error!(error = %e, "Exchange task failed");
                    Event::ExchangeFailed {
                        error: ExchangeError::transport(format!("Request failed: {e}")),
                    }
                }
            };
            let _ = outcome_tx.send(event).await;
        });
    }

    fn reject(&self, reason: &str) {
        tracing::warn!(reason, "Command rejected");
        self.notify(WidgetNotice::Rejected {
            reason: reason.to_string(),
        });
    }

    fn notify_input(&self) {
        self.notify(WidgetNotice::InputChanged {
            disabled: self.input.disabled,
            focused: self.input.focused,
        });
    }

    fn notify(&self, notice: WidgetNotice) {
        let _ = self.notice_tx.send(notice);
    }
}
