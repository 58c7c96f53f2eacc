use std::sync::Arc;

use egui::{Align2, Pos2, Stroke, vec2};

use super::{Tool, ToolSettings, format_price};
use crate::coords::{CoordinateMapper, DomainPoint};
use crate::drawing::{DEFAULT_FIB_RATIOS, Derived, Drawing, DrawingKind, DrawingStyle, FibLevel, LevelValue, LineDash};
use crate::geometry::distance_to_line_segment;
use crate::render::OverlaySurface;

/// Ladder of horizontal retracement levels between two anchors.
#[derive(Debug, Clone)]
pub struct FibRetracementTool {
    settings: ToolSettings,
}

/// `start + (end - start) * ratio` for every configured ratio, in configuration order.
/// An empty level set falls back to the standard ratios.
pub fn fib_level_table(start_price: f64, end_price: f64, levels: &[FibLevel]) -> Vec<LevelValue> {
    let range = end_price - start_price;
    let level_price = |ratio: f64| LevelValue {
        ratio,
        price: start_price + range * ratio,
    };
    if levels.is_empty() {
        DEFAULT_FIB_RATIOS.iter().map(|r| level_price(*r)).collect()
    } else {
        levels.iter().map(|l| level_price(l.ratio)).collect()
    }
}

/// Resolved screen geometry of a ladder for one frame.
struct Ladder {
    left: f32,
    right: f32,
    /// `(index into the level table, y)` for every level currently on screen.
    rows: Vec<(usize, f32)>,
}

impl FibRetracementTool {
    pub fn new(settings: ToolSettings) -> Self {
        Self { settings }
    }

    pub fn factory(settings: &ToolSettings) -> Arc<dyn Tool> {
        Arc::new(Self::new(*settings))
    }

    fn table(drawing: &Drawing) -> Vec<LevelValue> {
        match (drawing.derived(), drawing.anchors()) {
            (Derived::FibRetracement { levels }, _) => levels.clone(),
            (_, [start, end]) => fib_level_table(start.price, end.price, drawing.style().levels()),
            _ => Vec::new(),
        }
    }

    fn ladder(drawing: &Drawing, table: &[LevelValue], mapper: &dyn CoordinateMapper) -> Option<Ladder> {
        let [start, end] = drawing.anchors() else {
            return None;
        };
        let x1 = mapper.time_to_screen(start.time)?;
        let x2 = mapper.time_to_screen(end.time)?;
        let rows = table
            .iter()
            .enumerate()
            .filter_map(|(i, level)| Some((i, mapper.price_to_screen(level.price)?)))
            .collect();
        Some(Ladder {
            left: x1.min(x2),
            right: x1.max(x2),
            rows,
        })
    }
}

impl Tool for FibRetracementTool {
    fn kind(&self) -> DrawingKind {
        DrawingKind::FibRetracement
    }

    fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    fn create_drawing(&self, at: DomainPoint, style: DrawingStyle) -> Drawing {
        let start = self.settings.snap_point(at);
        Drawing::new(
            DrawingKind::FibRetracement,
            vec![start, start],
            style,
            crate::util::time::timestamp_millis(),
        )
    }

    fn compute_derived(&self, anchors: &[DomainPoint], style: &DrawingStyle) -> Derived {
        match anchors {
            [start, end] => Derived::FibRetracement {
                levels: fib_level_table(start.price, end.price, style.levels()),
            },
            _ => Derived::Pending,
        }
    }

    fn render(&self, surface: &mut dyn OverlaySurface, drawing: &Drawing, mapper: &dyn CoordinateMapper) {
        let table = Self::table(drawing);
        let Some(ladder) = Self::ladder(drawing, &table, mapper) else {
            return;
        };
        let style = drawing.style();
        let levels = style.levels();

        for (index, y) in &ladder.rows {
            let color = levels
                .get(*index)
                .map(|level| style.level_color(level))
                .unwrap_or(style.color());
            surface.segment(
                Pos2::new(ladder.left, *y),
                Pos2::new(ladder.right, *y),
                Stroke::new(style.width(), color),
                style.dash(),
            );
        }

        let [start, end] = drawing.anchors() else {
            return;
        };
        if let (Some(a), Some(b)) = (mapper.domain_to_screen(*start), mapper.domain_to_screen(*end)) {
            surface.segment(a, b, Stroke::new(1.0, style.color()), LineDash::Dotted);
        }

        let extent = ladder
            .rows
            .iter()
            .map(|(_, y)| *y)
            .fold(None, |acc: Option<(f32, f32)>, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
            .map_or(0.0, |(lo, hi)| hi - lo);
        if extent < self.settings.min_decoration_extent || !style.show_labels() {
            return;
        }

        let decimals = self.settings.label_decimals();
        for (index, y) in &ladder.rows {
            let level = table[*index];
            let color = levels
                .get(*index)
                .map(|l| style.level_color(l))
                .unwrap_or(style.color());
            let text = format!("{} ({})", level.ratio, format_price(level.price, decimals));
            surface.label(Pos2::new(ladder.left, *y) + vec2(4.0, -2.0), Align2::LEFT_BOTTOM, &text, color);
        }
    }

    fn hit_test(&self, drawing: &Drawing, point: Pos2, tolerance: f32, mapper: &dyn CoordinateMapper) -> bool {
        let table = Self::table(drawing);
        let Some(ladder) = Self::ladder(drawing, &table, mapper) else {
            return false;
        };
        ladder
            .rows
            .iter()
            .map(|(_, y)| {
                distance_to_line_segment(point, Pos2::new(ladder.left, *y), Pos2::new(ladder.right, *y))
            })
            .fold(f32::INFINITY, f32::min)
            <= tolerance
    }
}
