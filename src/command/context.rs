use crate::drawing::Drawing;
use crate::render::RenderBridge;

/// What a command may touch: the committed collection and the render hooks
/// attached for it.
pub struct CommandContext<'a> {
    /// Committed drawings in z-order
    pub drawings: &'a mut Vec<Drawing>,
    /// Bridge owning one render hook per committed drawing
    pub bridge: &'a mut dyn RenderBridge,
}

impl<'a> CommandContext<'a> {
    pub fn new(drawings: &'a mut Vec<Drawing>, bridge: &'a mut dyn RenderBridge) -> Self {
        Self { drawings, bridge }
    }

    pub(crate) fn insert(&mut self, index: usize, drawing: Drawing) {
        if let Some(id) = drawing.id() {
            let index = index.min(self.drawings.len());
            self.drawings.insert(index, drawing);
            self.bridge.attach(id);
        }
    }

    /// Hook first, then the collection entry.
    pub(crate) fn remove(&mut self, id: crate::id_generator::DrawingId) -> Option<Drawing> {
        let index = self.drawings.iter().position(|d| d.id() == Some(id))?;
        self.bridge.detach(id);
        Some(self.drawings.remove(index))
    }
}
