use std::sync::Arc;

use egui::{Align2, Pos2, vec2};

use super::{MARKER_RADIUS, Tool, ToolSettings, format_signed};
use crate::coords::{CoordinateMapper, DomainPoint};
use crate::drawing::{Derived, Drawing, DrawingKind, DrawingStyle, TrendMetrics};
use crate::geometry::distance_to_line_segment;
use crate::render::OverlaySurface;

/// Straight segment between two anchors.
#[derive(Debug, Clone)]
pub struct TrendLineTool {
    settings: ToolSettings,
}

impl TrendLineTool {
    pub fn new(settings: ToolSettings) -> Self {
        Self { settings }
    }

    pub fn factory(settings: &ToolSettings) -> Arc<dyn Tool> {
        Arc::new(Self::new(*settings))
    }

    fn endpoints(drawing: &Drawing, mapper: &dyn CoordinateMapper) -> Option<(Pos2, Pos2)> {
        match drawing.anchors() {
            [start, end] => Some((mapper.domain_to_screen(*start)?, mapper.domain_to_screen(*end)?)),
            _ => None,
        }
    }

    fn label(&self, metrics: &TrendMetrics) -> String {
        let delta = format_signed(metrics.price_delta, self.settings.label_decimals());
        match metrics.percent_change {
            Some(pct) => format!("{delta} ({pct:+.2}%)"),
            None => delta,
        }
    }
}

/// Deltas, percentage, length and angle between two anchors.
pub fn trend_metrics(start: DomainPoint, end: DomainPoint) -> TrendMetrics {
    let time_delta = end.time - start.time;
    let price_delta = end.price - start.price;
    let percent_change = if start.price == 0.0 {
        None
    } else {
        Some(price_delta / start.price * 100.0)
    };
    TrendMetrics {
        time_delta,
        price_delta,
        percent_change,
        length: time_delta.hypot(price_delta),
        angle_degrees: price_delta.atan2(time_delta).to_degrees(),
    }
}

impl Tool for TrendLineTool {
    fn kind(&self) -> DrawingKind {
        DrawingKind::TrendLine
    }

    fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    fn create_drawing(&self, at: DomainPoint, style: DrawingStyle) -> Drawing {
        let start = self.settings.snap_point(at);
        Drawing::new(
            DrawingKind::TrendLine,
            vec![start, start],
            style,
            crate::util::time::timestamp_millis(),
        )
    }

    fn compute_derived(&self, anchors: &[DomainPoint], _style: &DrawingStyle) -> Derived {
        match anchors {
            [start, end] => Derived::TrendLine(trend_metrics(*start, *end)),
            _ => Derived::Pending,
        }
    }

    fn render(&self, surface: &mut dyn OverlaySurface, drawing: &Drawing, mapper: &dyn CoordinateMapper) {
        let Some((a, b)) = Self::endpoints(drawing, mapper) else {
            return;
        };
        let style = drawing.style();
        surface.segment(a, b, style.stroke(), style.dash());

        if a.distance(b) < self.settings.min_decoration_extent {
            return;
        }
        surface.marker(a, MARKER_RADIUS, style.color());
        surface.marker(b, MARKER_RADIUS, style.color());

        if style.show_labels() {
            let metrics = match drawing.derived() {
                Derived::TrendLine(metrics) => *metrics,
                _ => trend_metrics(drawing.anchors()[0], drawing.anchors()[1]),
            };
            surface.label(b + vec2(6.0, -4.0), Align2::LEFT_BOTTOM, &self.label(&metrics), style.color());
        }
    }

    fn hit_test(&self, drawing: &Drawing, point: Pos2, tolerance: f32, mapper: &dyn CoordinateMapper) -> bool {
        Self::endpoints(drawing, mapper)
            .is_some_and(|(a, b)| distance_to_line_segment(point, a, b) <= tolerance)
    }
}
