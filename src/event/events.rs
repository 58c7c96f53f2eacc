use crate::drawing::DrawingKind;
use crate::id_generator::DrawingId;

/// Notifications published by the drawing manager.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationEvent {
    ToolActivated {
        kind: DrawingKind,
    },
    ToolDeactivated {
        kind: DrawingKind,
    },
    GestureStarted {
        kind: DrawingKind,
    },
    GestureFinished {
        id: DrawingId,
        kind: DrawingKind,
    },
    GestureCancelled {
        kind: DrawingKind,
    },
    DrawingRemoved {
        id: DrawingId,
    },
    CollectionCleared {
        count: usize,
    },
    ImportFinished {
        imported: usize,
        skipped: usize,
    },
    HistoryChanged(HistoryEvent),
    HoverChanged {
        id: Option<DrawingId>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEvent {
    Undone,
    Redone,
}
