//! Controller state types

/// Submission controller state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WidgetState {
    /// Input enabled, accepting new turns
    #[default]
    Idle,

    /// Request sent, input disabled until it resolves
    InFlight {
        /// The trimmed message that was sent
        message: String,
    },
}

impl WidgetState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, WidgetState::InFlight { .. })
    }
}

/// Context for a widget instance (immutable configuration)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetContext {
    pub user_id: i64,
}

impl WidgetContext {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }
}
