use std::cell::RefCell;
use crate::event::{EditorEvent, EventHandler};

/// A simple event bus for broadcasting editor events to registered handlers
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Emit an event to all registered handlers.
    ///
    /// Handlers must not emit on the same bus from inside `handle_event`.
    pub fn emit(&self, event: EditorEvent) {
        log::trace!("Event: {:?}", event);
        for handler in &mut *self.handlers.borrow_mut() {
            handler.handle_event(&event);
        }
    }

    /// Shorthand for a status bar message
    pub fn status(&self, message: impl Into<String>) {
        self.emit(EditorEvent::Status(message.into()));
    }

    pub fn warning(&self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.emit(EditorEvent::Warning(message));
    }
}
