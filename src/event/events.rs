use egui::{Pos2, Rect};
use uuid::Uuid;

use crate::scene::SceneState;
use crate::tools::Tool;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Informational status bar text
    Status(String),
    /// A recoverable failure, e.g. an operation refused for lack of a selection
    Warning(String),
    ToolChanged {
        old: Tool,
        new: Tool,
    },
    StateChanged {
        old: SceneState,
        new: SceneState,
    },
    SelectionChanged(SelectionEvent),
    DocumentChanged(DocumentEvent),
    ItemChanged(ItemEvent),
    HistoryChanged {
        can_undo: bool,
        can_redo: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    Started { anchor: Pos2 },
    /// Geometry changed while dragging out or resizing
    InProgress { bounds: Rect },
    /// Handles generated for the final rectangle
    Finalized { bounds: Rect },
    Cleared,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    Loaded { width: u32, height: u32 },
    Modified,
    Saved,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemEvent {
    Pasted { id: Uuid },
    Moved { id: Uuid, position: Pos2 },
    Fixed { count: usize },
}
