use super::{CommandContext, CommandError, CommandResult};
use crate::drawing::Drawing;

/// Undoable changes to the drawing collection.
///
/// Each command carries the committed drawings it affects, so its inverse never has
/// to consult anything but the collection itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append a committed drawing on top of the z-order
    AddDrawing(Drawing),

    /// Remove a drawing; `index` is its z-position, restored on undo
    RemoveDrawing { drawing: Drawing, index: usize },

    /// Remove every drawing
    ClearAll { drawings: Vec<Drawing> },

    /// Append a batch of imported drawings
    ImportBatch { drawings: Vec<Drawing> },
}

impl Command {
    /// Execute the command with the given context
    pub fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        match self {
            Command::AddDrawing(drawing) => {
                let id = drawing.id().ok_or(CommandError::InvalidParameters("drawing has no id"))?;
                if ctx.drawings.iter().any(|d| d.id() == Some(id)) {
                    return Err(CommandError::InvalidState);
                }
                let end = ctx.drawings.len();
                ctx.insert(end, drawing.clone());
            }
            Command::RemoveDrawing { drawing, .. } => {
                let id = drawing.id().ok_or(CommandError::InvalidParameters("drawing has no id"))?;
                ctx.remove(id).ok_or(CommandError::InvalidState)?;
            }
            Command::ClearAll { drawings } => {
                for drawing in drawings {
                    if let Some(id) = drawing.id() {
                        ctx.remove(id);
                    }
                }
            }
            Command::ImportBatch { drawings } => {
                for drawing in drawings {
                    let end = ctx.drawings.len();
                    ctx.insert(end, drawing.clone());
                }
            }
        }
        Ok(())
    }

    /// Apply the inverse of [`Command::execute`]
    pub fn undo(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        match self {
            Command::AddDrawing(drawing) => {
                let id = drawing.id().ok_or(CommandError::InvalidParameters("drawing has no id"))?;
                ctx.remove(id).ok_or(CommandError::InvalidState)?;
            }
            Command::RemoveDrawing { drawing, index } => {
                ctx.insert(*index, drawing.clone());
            }
            Command::ClearAll { drawings } => {
                for (index, drawing) in drawings.iter().enumerate() {
                    ctx.insert(index, drawing.clone());
                }
            }
            Command::ImportBatch { drawings } => {
                for drawing in drawings {
                    if let Some(id) = drawing.id() {
                        ctx.remove(id);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::AddDrawing(_) => "AddDrawing",
            Command::RemoveDrawing { .. } => "RemoveDrawing",
            Command::ClearAll { .. } => "ClearAll",
            Command::ImportBatch { .. } => "ImportBatch",
        }
    }
}
