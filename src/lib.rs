#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod config;
pub mod coords;
pub mod drawing;
pub mod error;
pub mod event;
pub mod geometry;
pub mod id_generator;
pub mod input;
pub mod manager;
pub mod navigation;
mod panels;
pub mod persistence;
pub mod render;
pub mod state;
pub mod tools;
pub mod util;

pub use app::ChartApp;
pub use command::{Command, CommandHistory};
pub use config::{EngineConfig, SnapConfig};
pub use coords::{CoordinateMapper, DomainPoint, LinearMapper};
pub use drawing::{Derived, Drawing, DrawingKind, DrawingStyle};
pub use error::{ConfigError, RecordError, ToolError};
pub use event::{AnnotationEvent, EventBus};
pub use id_generator::DrawingId;
pub use input::{InputHandler, PointerEvent};
pub use manager::{DrawingManager, ToolSelection};
pub use navigation::{NavigationGuard, NavigationLock};
pub use persistence::{DrawingRecord, ImportReport, PersistenceError};
pub use render::{AttachedOverlayBridge, CanvasOverlayBridge, RecordingSurface, RenderBridge};
pub use state::{ManagerState, Phase};
pub use tools::{Tool, ToolRegistry};
