use std::collections::BTreeMap;
use std::sync::Arc;

use egui::Pos2;

use crate::config::{EngineConfig, SnapConfig};
use crate::coords::{CoordinateMapper, DomainPoint};
use crate::drawing::{Derived, Drawing, DrawingKind, DrawingStyle};
use crate::error::{RecordError, ToolError};
use crate::persistence::DrawingRecord;
use crate::render::OverlaySurface;

mod fib_retracement;
mod horizontal_line;
mod trend_line;

pub use fib_retracement::{FibRetracementTool, fib_level_table};
pub use horizontal_line::HorizontalLineTool;
pub use trend_line::{TrendLineTool, trend_metrics};

/// Radius of endpoint markers in pixels.
pub const MARKER_RADIUS: f32 = 3.0;

/// Settings shared by every tool, taken from [`EngineConfig`] once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSettings {
    pub snap: SnapConfig,
    pub min_decoration_extent: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for ToolSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            snap: config.snap,
            min_decoration_extent: config.min_decoration_extent,
        }
    }
}

impl ToolSettings {
    /// Decimals used when printing prices in labels.
    pub fn label_decimals(&self) -> usize {
        if self.snap.enabled { self.snap.decimals as usize } else { 2 }
    }

    pub fn snap_point(&self, point: DomainPoint) -> DomainPoint {
        DomainPoint::new(point.time, self.snap.apply(point.price))
    }
}

/// Geometry and rendering policy for one drawing kind.
///
/// Tools hold no per-drawing state. The manager lends a tool the in-progress drawing
/// for the duration of a gesture; committed drawings are only ever read.
pub trait Tool: Send + Sync {
    fn kind(&self) -> DrawingKind;

    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn settings(&self) -> &ToolSettings;

    /// Minimal valid drawing started from a single point.
    fn create_drawing(&self, at: DomainPoint, style: DrawingStyle) -> Drawing;

    /// Move the trailing anchor during a drag.
    fn update_drawing_data(&self, drawing: &mut Drawing, at: DomainPoint) {
        let snapped = self.settings().snap_point(at);
        if let Some(anchor) = drawing.trailing_anchor_mut() {
            *anchor = snapped;
        }
    }

    /// Kind-specific values. Must be a pure function of its inputs.
    fn compute_derived(&self, anchors: &[DomainPoint], style: &DrawingStyle) -> Derived;

    /// Last update of the gesture plus derived fields.
    fn finalize_drawing_data(&self, drawing: &mut Drawing, at: DomainPoint) {
        self.update_drawing_data(drawing, at);
        self.refresh_derived(drawing);
    }

    fn refresh_derived(&self, drawing: &mut Drawing) {
        let derived = self.compute_derived(drawing.anchors(), drawing.style());
        drawing.set_derived(derived);
    }

    /// Paint the drawing. Unresolved coordinates skip the element silently.
    fn render(&self, surface: &mut dyn OverlaySurface, drawing: &Drawing, mapper: &dyn CoordinateMapper);

    /// Whether `point` lies within `tolerance` pixels of the rendered geometry.
    fn hit_test(&self, drawing: &Drawing, point: Pos2, tolerance: f32, mapper: &dyn CoordinateMapper) -> bool;

    fn serialize(&self, drawing: &Drawing) -> DrawingRecord {
        DrawingRecord::from_drawing(drawing)
    }

    /// Rebuild a drawing from a record. Derived data is always recomputed.
    fn deserialize(&self, record: &DrawingRecord, fallback: &DrawingStyle) -> Result<Drawing, RecordError> {
        let kind: DrawingKind = record.kind.parse()?;
        if kind != self.kind() {
            return Err(RecordError::Malformed(format!(
                "{} record handed to {} tool",
                kind,
                self.kind()
            )));
        }
        if record.anchors.len() != kind.anchor_count() {
            return Err(RecordError::AnchorCount {
                kind,
                expected: kind.anchor_count(),
                found: record.anchors.len(),
            });
        }
        if let Some(index) = record.anchors.iter().position(|a| !a.is_finite()) {
            return Err(RecordError::NonFiniteAnchor { index });
        }

        let style = DrawingStyle::from_record(&record.style, fallback);
        let created_at = record.created_at.unwrap_or_else(crate::util::time::timestamp_millis);
        let mut drawing = Drawing::new(kind, record.anchors.clone(), style, created_at);
        self.refresh_derived(&mut drawing);
        Ok(drawing)
    }
}

/// Builds a tool from the shared settings.
pub type ToolFactory = fn(&ToolSettings) -> Arc<dyn Tool>;

/// Typed kind → tool mapping, resolved once when the registry is built.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<DrawingKind, Arc<dyn Tool>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("kinds", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the three built-in tools.
    pub fn with_defaults(settings: &ToolSettings) -> Self {
        let mut registry = Self::new();
        registry.register_factory(TrendLineTool::factory, settings);
        registry.register_factory(HorizontalLineTool::factory, settings);
        registry.register_factory(FibRetracementTool::factory, settings);
        registry
    }

    /// Register a tool, replacing any previous tool of the same kind.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        log::debug!("Registering tool {}", tool.name());
        self.tools.insert(tool.kind(), tool);
    }

    pub fn register_factory(&mut self, factory: ToolFactory, settings: &ToolSettings) {
        self.register(factory(settings));
    }

    pub fn get(&self, kind: DrawingKind) -> Result<&Arc<dyn Tool>, ToolError> {
        self.tools.get(&kind).ok_or(ToolError::NotRegistered(kind))
    }

    /// Look a tool up by its persisted tag.
    pub fn resolve(&self, tag: &str) -> Result<&Arc<dyn Tool>, ToolError> {
        self.get(tag.parse()?)
    }

    pub fn kinds(&self) -> impl Iterator<Item = DrawingKind> + '_ {
        self.tools.keys().copied()
    }

    pub fn contains(&self, kind: DrawingKind) -> bool {
        self.tools.contains_key(&kind)
    }
}

pub(crate) fn format_signed(value: f64, decimals: usize) -> String {
    format!("{:+.*}", decimals, value)
}

pub(crate) fn format_price(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}
