//! Pointer-to-annotation state machine.
//!
//! ```text
//!              select tool                 pointer-down
//!   ┌──────┐ ──────────────► ┌───────┐ ──────────────────► ┌─────────┐
//!   │ Idle │                 │ Armed │                     │ Drawing │
//!   └──────┘ ◄────────────── └───────┘ ◄────────────────── └─────────┘
//!          deselect / reselect           pointer-up (commit)
//!                                        pointer-leave (discard)
//! ```
//!
//! Deselecting while in `Drawing` discards the gesture and goes straight to `Idle`.
//! Selecting a tool while in `Drawing` is ignored.

use std::sync::Arc;

use crate::drawing::{Drawing, DrawingKind};
use crate::navigation::NavigationGuard;
use crate::tools::Tool;

/// Coarse state, for callers that only need to know where the machine is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Armed,
    Drawing,
}

/// The manager's state. Invariant: a drawing is in progress iff the state is
/// `Drawing`, and that state is the only owner of the navigation guard.
#[derive(Default)]
pub enum ManagerState {
    /// No tool active
    #[default]
    Idle,
    /// Tool active, waiting for a pointer-down
    Armed { tool: Arc<dyn Tool> },
    /// Pointer held, anchors following the pointer
    Drawing {
        tool: Arc<dyn Tool>,
        drawing: Drawing,
        navigation: Option<NavigationGuard>,
    },
}

impl std::fmt::Debug for ManagerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Armed { tool } => f.debug_struct("Armed").field("tool", &tool.name()).finish(),
            Self::Drawing { tool, drawing, navigation } => f
                .debug_struct("Drawing")
                .field("tool", &tool.name())
                .field("anchors", &drawing.anchors())
                .field("navigation_locked", &navigation.is_some())
                .finish(),
        }
    }
}

impl ManagerState {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Armed { .. } => Phase::Armed,
            Self::Drawing { .. } => Phase::Drawing,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }

    /// Kind of the active tool, if any
    pub fn active_kind(&self) -> Option<DrawingKind> {
        match self {
            Self::Idle => None,
            Self::Armed { tool } | Self::Drawing { tool, .. } => Some(tool.kind()),
        }
    }

    pub fn in_progress(&self) -> Option<&Drawing> {
        match self {
            Self::Drawing { drawing, .. } => Some(drawing),
            _ => None,
        }
    }
}
