//! Runtime for driving a widget instance
//!
//! The host (a page shim, the terminal binary, or a test) feeds [`Command`]s in
//! and observes [`WidgetNotice`]s; the executor owns all widget state.

mod executor;


pub use executor::ChatRuntime;

use crate::backend::ChatBackend;
use crate::protocol::RequestEnvelope;
use crate::state_machine::WidgetContext;
use crate::transcript::{BoundControl, ControlId, Transcript};
use tokio::sync::{broadcast, mpsc};
use tokio::task::{JoinError, JoinHandle};

const COMMAND_BUFFER: usize = 32;
const NOTICE_BUFFER: usize = 256;

/// Keys the input control reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

/// User actions delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the input value (typing)
    SetInput(String),
    KeyDown { key: Key, shift: bool },
    /// The form's submit action
    SubmitForm,
    /// An option button was clicked
    ActivateOption(ControlId),
}

/// The text input and its affordances
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputControl {
    pub value: String,
    pub disabled: bool,
    pub focused: bool,
}

/// Events sent to hosts
#[derive(Debug, Clone)]
pub enum WidgetNotice {
    /// A turn was rendered and appended; `html` is its full markup
    TurnAppended {
        index: usize,
        html: String,
        controls: Vec<BoundControl>,
    },
    /// The input control's affordances changed
    InputChanged {
        disabled: bool,
        focused: bool,
    },
    RequestSent {
        envelope: RequestEnvelope,
    },
    /// A command was refused (for example while a reply is pending)
    Rejected {
        reason: String,
    },
    ConversationEnded,
}

/// Handle to interact with a running widget
pub struct WidgetHandle {
    pub commands: mpsc::Sender<Command>,
    pub notices: broadcast::Receiver<WidgetNotice>,
    task: JoinHandle<Transcript>,
}

impl WidgetHandle {
    /// Deliver a command; false once the runtime has stopped
    pub async fn send(&self, command: Command) -> bool {
        self.commands.send(command).await.is_ok()
    }

    /// Stop accepting commands and wait for the final transcript.
    ///
    /// A turn still in flight resolves first.
    pub async fn finish(self) -> Result<Transcript, JoinError> {
        let WidgetHandle { commands, task, .. } = self;
        drop(commands);
        task.await
    }
}

/// Start a widget runtime on the current tokio runtime
pub fn spawn_widget<B>(
    context: WidgetContext,
    backend: B,
    initial_message: Option<String>,
) -> WidgetHandle
where
    B: ChatBackend + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (notice_tx, notices) = broadcast::channel(NOTICE_BUFFER);

    let runtime = ChatRuntime::new(context, backend, command_rx, notice_tx)
        .with_initial_message(initial_message);
    let task = tokio::spawn(runtime.run());

    WidgetHandle {
        commands: command_tx,
        notices,
        task,
    }
}
