//! Rendering bridge between drawings and the host chart's paint pass.

mod bridge;
mod surface;

pub use bridge::{AttachedOverlayBridge, CanvasOverlayBridge, RenderBridge, RepaintHook, RepaintScheduler, Scene};
pub use surface::{LABEL_FONT_SIZE, OverlaySurface, PainterSurface, Primitive, RecordingSurface};
