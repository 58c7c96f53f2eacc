use egui::{Align2, Color32, FontId, Painter, Pos2, Shape, Stroke};

use crate::drawing::LineDash;

/// Font size of value labels.
pub const LABEL_FONT_SIZE: f32 = 11.0;

/// Paint target for annotation geometry.
///
/// Tools only ever emit these three primitives, which keeps the two render bridge
/// implementations comparable primitive by primitive.
pub trait OverlaySurface {
    fn segment(&mut self, from: Pos2, to: Pos2, stroke: Stroke, dash: LineDash);
    fn marker(&mut self, center: Pos2, radius: f32, color: Color32);
    fn label(&mut self, anchor: Pos2, align: Align2, text: &str, color: Color32);
}

/// A resolved screen-space primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Segment {
        from: Pos2,
        to: Pos2,
        stroke: Stroke,
        dash: LineDash,
    },
    Marker {
        center: Pos2,
        radius: f32,
        color: Color32,
    },
    Label {
        anchor: Pos2,
        align: Align2,
        text: String,
        color: Color32,
    },
}

impl Primitive {
    pub fn replay(&self, surface: &mut dyn OverlaySurface) {
        match self {
            Self::Segment { from, to, stroke, dash } => surface.segment(*from, *to, *stroke, *dash),
            Self::Marker { center, radius, color } => surface.marker(*center, *radius, *color),
            Self::Label { anchor, align, text, color } => surface.label(*anchor, *align, text, *color),
        }
    }
}

/// Collects primitives instead of painting them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSurface {
    primitives: Vec<Primitive>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn clear(&mut self) {
        self.primitives.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = (Pos2, Pos2)> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Segment { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Label { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn replay(&self, surface: &mut dyn OverlaySurface) {
        for primitive in &self.primitives {
            primitive.replay(surface);
        }
    }
}

impl OverlaySurface for RecordingSurface {
    fn segment(&mut self, from: Pos2, to: Pos2, stroke: Stroke, dash: LineDash) {
        self.primitives.push(Primitive::Segment { from, to, stroke, dash });
    }

    fn marker(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.primitives.push(Primitive::Marker { center, radius, color });
    }

    fn label(&mut self, anchor: Pos2, align: Align2, text: &str, color: Color32) {
        self.primitives.push(Primitive::Label {
            anchor,
            align,
            text: text.to_owned(),
            color,
        });
    }
}

/// Paints into the host's egui painter, inheriting its clip rect and scale.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter) -> Self {
        Self { painter }
    }
}

impl OverlaySurface for PainterSurface<'_> {
    fn segment(&mut self, from: Pos2, to: Pos2, stroke: Stroke, dash: LineDash) {
        match dash.pattern(stroke.width) {
            None => {
                self.painter.line_segment([from, to], stroke);
            }
            Some((dash_length, gap_length)) => {
                self.painter
                    .extend(Shape::dashed_line(&[from, to], stroke, dash_length, gap_length));
            }
        }
    }

    fn marker(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.painter.circle_filled(center, radius, color);
    }

    fn label(&mut self, anchor: Pos2, align: Align2, text: &str, color: Color32) {
        self.painter
            .text(anchor, align, text, FontId::proportional(LABEL_FONT_SIZE), color);
    }
}
