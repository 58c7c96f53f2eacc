mod commands;
mod context;
mod history;

pub use commands::Command;
pub use context::CommandContext;
pub use history::{CommandHistory, DEFAULT_HISTORY_LIMIT};

use thiserror::Error;

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during command execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The command cannot be executed in the current state
    #[error("Command is not applicable to the current collection")]
    InvalidState,
    /// The command parameters are invalid
    #[error("Invalid command parameters: {0}")]
    InvalidParameters(&'static str),
    /// Nothing to undo or redo
    #[error("History is empty")]
    EmptyHistory,
}
