use std::sync::Arc;

use egui::{Align2, Pos2, vec2};

use super::{MARKER_RADIUS, Tool, ToolSettings, format_price};
use crate::coords::{CoordinateMapper, DomainPoint};
use crate::drawing::{Derived, Drawing, DrawingKind, DrawingStyle};
use crate::geometry::vertical_distance;
use crate::render::OverlaySurface;

/// A price level spanning the whole viewport. One anchor; only its price matters
/// for geometry, the time is kept so the level remembers where it was placed.
#[derive(Debug, Clone)]
pub struct HorizontalLineTool {
    settings: ToolSettings,
}

impl HorizontalLineTool {
    pub fn new(settings: ToolSettings) -> Self {
        Self { settings }
    }

    pub fn factory(settings: &ToolSettings) -> Arc<dyn Tool> {
        Arc::new(Self::new(*settings))
    }

    fn level_y(drawing: &Drawing, mapper: &dyn CoordinateMapper) -> Option<f32> {
        let anchor = drawing.anchors().first()?;
        mapper.price_to_screen(anchor.price)
    }
}

impl Tool for HorizontalLineTool {
    fn kind(&self) -> DrawingKind {
        DrawingKind::HorizontalLine
    }

    fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    fn create_drawing(&self, at: DomainPoint, style: DrawingStyle) -> Drawing {
        Drawing::new(
            DrawingKind::HorizontalLine,
            vec![self.settings.snap_point(at)],
            style,
            crate::util::time::timestamp_millis(),
        )
    }

    fn compute_derived(&self, anchors: &[DomainPoint], _style: &DrawingStyle) -> Derived {
        match anchors {
            [anchor] => Derived::HorizontalLine { price: anchor.price },
            _ => Derived::Pending,
        }
    }

    fn render(&self, surface: &mut dyn OverlaySurface, drawing: &Drawing, mapper: &dyn CoordinateMapper) {
        let Some(y) = Self::level_y(drawing, mapper) else {
            return;
        };
        let viewport = mapper.viewport();
        let style = drawing.style();
        let (left, right) = (Pos2::new(viewport.left(), y), Pos2::new(viewport.right(), y));
        surface.segment(left, right, style.stroke(), style.dash());

        if viewport.width() < self.settings.min_decoration_extent {
            return;
        }
        let anchor = drawing.anchors()[0];
        if let Some(x) = mapper.time_to_screen(anchor.time) {
            surface.marker(Pos2::new(x, y), MARKER_RADIUS, style.color());
        }
        if style.show_labels() {
            let text = format_price(anchor.price, self.settings.label_decimals());
            surface.label(right + vec2(-4.0, -2.0), Align2::RIGHT_BOTTOM, &text, style.color());
        }
    }

    fn hit_test(&self, drawing: &Drawing, point: Pos2, tolerance: f32, mapper: &dyn CoordinateMapper) -> bool {
        Self::level_y(drawing, mapper).is_some_and(|y| vertical_distance(point, y) <= tolerance)
    }
}
