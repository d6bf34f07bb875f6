//! Session continuity across turns

/// The service-assigned session identifier for this widget instance.
///
/// `None` until the first reply that carries one; afterwards replaced by
/// each reply that carries a non-empty identifier and kept when a reply
/// omits it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    session_uuid: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&str> {
        self.session_uuid.as_deref()
    }

    /// Apply the identifier from a resolved reply
    pub fn update(&mut self, session_uuid: Option<&str>) {
        match session_uuid.filter(|uuid| !uuid.is_empty()) {
            Some(uuid) if self.current() != Some(uuid) => {
                tracing::info!(session_uuid = %uuid, "Session UUID updated");
                self.session_uuid = Some(uuid.to_string());
            }
            Some(_) => {}
            None => tracing::debug!("Reply carried no session UUID, keeping current"),
        }
    }
}
