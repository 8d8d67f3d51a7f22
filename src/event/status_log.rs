use std::sync::Arc;

use parking_lot::Mutex;

use crate::event::{EditorEvent, EventHandler};

/// Records every event it receives.
///
/// Clones share the same log, so one clone can be subscribed to an
/// [`EventBus`](super::EventBus) while another is kept for reading.
#[derive(Debug, Clone, Default)]
pub struct StatusLog {
    events: Arc<Mutex<Vec<EditorEvent>>>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.lock().clone()
    }

    /// Most recent status or warning text
    pub fn last_message(&self) -> Option<String> {
        self.events.lock().iter().rev().find_map(|event| match event {
            EditorEvent::Status(text) | EditorEvent::Warning(text) => Some(text.clone()),
            _ => None,
        })
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                EditorEvent::Warning(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventHandler for StatusLog {
    fn handle_event(&mut self, event: &EditorEvent) {
        self.events.lock().push(event.clone());
    }
}
