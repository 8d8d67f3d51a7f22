mod commands;
mod context;
mod history;

pub use commands::Command;
pub use context::CommandContext;
pub use history::CommandHistory;

use crate::error::EditorError;

/// Result type for command operations
pub type CommandResult<T = ()> = Result<T, EditorError>;
