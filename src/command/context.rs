use crate::capability::Capabilities;
use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::document::Document;
use crate::event::EventBus;
use crate::scene::Scene;

/// Session parts a command may read or change, borrowed for one call.
pub struct CommandContext<'a> {
    /// The base image and floating items
    pub document: &'a mut Document,
    /// Selection and pointer state
    pub scene: &'a mut Scene,
    pub clipboard: &'a mut dyn Clipboard,
    pub capabilities: &'a Capabilities,
    /// The event bus for broadcasting changes
    pub events: &'a EventBus,
    pub config: &'a EditorConfig,
}

impl std::fmt::Debug for CommandContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("document", &self.document)
            .field("scene", &self.scene)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}
