use log::{debug, info};

use super::{Command, CommandContext, CommandResult};

/// Manages the history of executed commands for undo/redo functionality
#[derive(Debug, Default)]
pub struct CommandHistory {
    /// Stack of commands that can be undone
    undo_stack: Vec<Command>,
    /// Stack of commands that can be redone
    redo_stack: Vec<Command>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a command and add it to the history if successful.
    ///
    /// A failed command is dropped and both stacks stay as they were.
    pub fn execute(&mut self, mut command: Command, ctx: &mut CommandContext<'_>) -> CommandResult {
        command.execute(ctx)?;
        info!("Executed: {}", command.description());
        self.push(command);
        Ok(())
    }

    /// Like [`execute`](Self::execute), but first evicts the oldest entries
    /// so the undo stack holds at most `limit` commands afterwards.
    pub fn execute_with_limit(
        &mut self,
        mut command: Command,
        ctx: &mut CommandContext<'_>,
        limit: usize,
    ) -> CommandResult {
        command.execute(ctx)?;
        let limit = limit.max(1);
        if self.undo_stack.len() >= limit {
            let evicted = self.undo_stack.len() + 1 - limit;
            self.undo_stack.drain(..evicted);
            debug!("Evicted {} oldest undo entries", evicted);
        }
        info!("Executed: {}", command.description());
        self.push(command);
        Ok(())
    }

    fn push(&mut self, command: Command) {
        self.undo_stack.push(command);
        // Linear history: a new command invalidates everything undone
        self.redo_stack.clear();
    }

    /// Undo the last executed command. Returns false if there was nothing to undo.
    pub fn undo(&mut self, ctx: &mut CommandContext<'_>) -> bool {
        let Some(mut command) = self.undo_stack.pop() else {
            return false;
        };
        command.undo(ctx);
        info!("Undone: {}", command.description());
        self.redo_stack.push(command);
        true
    }

    /// Redo the last undone command. Returns false if there was nothing to redo.
    ///
    /// If reapplying fails the command stays on the redo stack.
    pub fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult<bool> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(err) = command.redo(ctx) {
            self.redo_stack.push(command);
            return Err(err);
        }
        info!("Redone: {}", command.description());
        self.undo_stack.push(command);
        Ok(true)
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// The command an undo would revert
    pub fn last_command(&self) -> Option<&Command> {
        self.undo_stack.last()
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
