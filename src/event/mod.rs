mod bus;
mod events;
mod status_log;

pub use bus::EventBus;
pub use events::*;
pub use status_log::StatusLog;

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &EditorEvent);
}
