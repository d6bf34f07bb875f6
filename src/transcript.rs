//! Transcript appender
//!
//! The transcript is append-only: turns are rendered once when appended and
//! never touched again. Option buttons found in a bot turn are bound to
//! [`ControlId`]s so that activating one can be routed back to the
//! submission path with its raw payload.

use crate::markup::{Element, Node};
use crate::protocol::{Answer, ReplyItem};
use crate::render::{render_answer, OptionControl};
use crate::sanitize::{escape, Escaped};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Marker prepended to error notices
const ERROR_MARKER: &str = "\u{2757} ";

/// One unit of the conversation
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationTurn {
    User { text: String },
    Bot { answer: Answer },
    Error { message: String },
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        ConversationTurn::User { text: text.into() }
    }

    pub fn bot(answer: impl Into<Answer>) -> Self {
        ConversationTurn::Bot {
            answer: answer.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ConversationTurn::Error {
            message: message.into(),
        }
    }

    /// Synthetic bot turn for the host-configured greeting
    pub fn greeting(text: impl Into<String>) -> Self {
        Self::bot(vec![ReplyItem::plain_text(text)])
    }

    pub fn role(&self) -> &'static str {
        match self {
            ConversationTurn::User { .. } => "user",
            ConversationTurn::Bot { .. } => "bot",
            ConversationTurn::Error { .. } => "error",
        }
    }
}

// ============================================================================
// Control IDs
// ============================================================================

/// Identifies one option button: the turn it lives in and its position there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId {
    pub turn: usize,
    pub ordinal: usize,
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "opt-{}-{}", self.turn, self.ordinal)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid control id {0:?} (expected opt-<turn>-<n>)")]
pub struct ParseControlIdError(String);

impl FromStr for ControlId {
    type Err = ParseControlIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseControlIdError(s.to_string());
        let rest = s.strip_prefix("opt-").ok_or_else(err)?;
        let (turn, ordinal) = rest.split_once('-').ok_or_else(err)?;
        Ok(ControlId {
            turn: turn.parse().map_err(|_| err())?,
            ordinal: ordinal.parse().map_err(|_| err())?,
        })
    }
}

/// An option button after binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundControl {
    pub id: ControlId,
    pub label: String,
    pub payload: String,
}

// ============================================================================
// Transcript
// ============================================================================

/// A turn as it appears in the transcript
#[derive(Debug, Clone, PartialEq)]
pub struct AppendedTurn {
    pub index: usize,
    pub turn: ConversationTurn,
    pub markup: Element,
    pub controls: Vec<BoundControl>,
}

impl AppendedTurn {
    pub fn to_html(&self) -> String {
        self.markup.to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<AppendedTurn>,
    bindings: HashMap<ControlId, String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render and append a turn, binding any option controls it contains
    pub fn append(&mut self, turn: ConversationTurn) -> &AppendedTurn {
        let index = self.turns.len();
        let (mut markup, options) = match &turn {
            ConversationTurn::User { text } => (render_user_turn(text), Vec::new()),
            ConversationTurn::Bot { answer } => render_bot_turn(answer),
            ConversationTurn::Error { message } => (render_error_turn(message), Vec::new()),
        };

        let controls: Vec<BoundControl> = options
            .into_iter()
            .enumerate()
            .map(|(ordinal, opt)| BoundControl {
                id: ControlId {
                    turn: index,
                    ordinal,
                },
                label: opt.label,
                payload: opt.payload,
            })
            .collect();

        let mut ids = controls.iter().map(|c| c.id);
        bind_option_buttons(&mut markup, &mut ids);
        for control in &controls {
            self.bindings.insert(control.id, control.payload.clone());
        }

        tracing::debug!(
            index,
            role = turn.role(),
            controls = controls.len(),
            "Appended turn"
        );

        self.turns.push(AppendedTurn {
            index,
            turn,
            markup,
            controls,
        });
        &self.turns[index]
    }

    /// Raw payload bound to an option button
    pub fn payload_for(&self, id: ControlId) -> Option<&str> {
        self.bindings.get(&id).map(String::as_str)
    }

    pub fn turns(&self) -> &[AppendedTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The whole transcript inside the messages container
    pub fn to_html(&self) -> String {
        Element::new("div")
            .class("wpchatbot-messages")
            .children(self.turns.iter().map(|t| Node::from(t.markup.clone())))
            .to_string()
    }

    /// Write [`Transcript::to_html`] to a file
    pub fn write_html(&self, path: impl AsRef<Path>) -> io::Result<()> {
        std::fs::write(path, self.to_html())
    }
}

// ============================================================================
// Turn renderers
// ============================================================================

/// User text is text-only content: it is never interpreted as markup
fn render_user_turn(text: &str) -> Element {
    Element::new("div")
        .class("wpchatbot-user-message")
        .text(escape(text))
}

fn render_bot_turn(answer: &Answer) -> (Element, Vec<OptionControl>) {
    let fragment = render_answer(answer);
    let el = Element::new("div")
        .class("wpchatbot-bot-message")
        .children(fragment.nodes);
    (el, fragment.controls)
}

fn render_error_turn(message: &str) -> Element {
    Element::new("div").class("wpchatbot-bot-message").child(
        Element::new("p")
            .class("chatbot-error")
            .attr("style", Escaped::literal("color:red;"))
            .text(Escaped::literal(ERROR_MARKER))
            .text(escape(message)),
    )
}

/// Tag option buttons with their control id, in document order
fn bind_option_buttons(el: &mut Element, ids: &mut impl Iterator<Item = ControlId>) {
    if el.tag == "button" && el.has_class("chatbot-option-button") {
        if let Some(id) = ids.next() {
            el.attrs.push(("data-control-id", escape(&id.to_string())));
        }
    }
    for child in &mut el.children {
        if let Node::Element(child) = child {
            bind_option_buttons(child, ids);
        }
    }
}
