use super::{Command, CommandContext, CommandError, CommandResult};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Manages the history of executed commands for undo/redo functionality
#[derive(Debug, Clone)]
pub struct CommandHistory {
    /// Stack of commands that can be undone
    undo_stack: Vec<Command>,
    /// Stack of commands that can be redone
    redo_stack: Vec<Command>,
    limit: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHistory {
    /// Creates a new empty command history
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Execute a command and add it to the history if successful
    pub fn execute(&mut self, command: Command, ctx: &mut CommandContext<'_>) -> CommandResult {
        command.execute(ctx)?;
        log::debug!("Executed {}", command.name());

        self.undo_stack.push(command);
        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
        Ok(())
    }

    /// Undo the last executed command
    pub fn undo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let command = self.undo_stack.pop().ok_or(CommandError::EmptyHistory)?;
        if let Err(err) = command.undo(ctx) {
            log::warn!("Undo of {} failed: {}", command.name(), err);
            return Err(err);
        }
        self.redo_stack.push(command);
        Ok(())
    }

    /// Redo the last undone command
    pub fn redo(&mut self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let command = self.redo_stack.pop().ok_or(CommandError::EmptyHistory)?;
        if let Err(err) = command.execute(ctx) {
            log::warn!("Redo of {} failed: {}", command.name(), err);
            return Err(err);
        }
        self.undo_stack.push(command);
        Ok(())
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
