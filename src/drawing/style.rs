use egui::{Color32, Stroke};
use serde::{Deserialize, Serialize};

pub const MIN_LINE_WIDTH: f32 = 0.5;
pub const MAX_LINE_WIDTH: f32 = 8.0;

/// Dash pattern of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineDash {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineDash {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
        }
    }

    /// Lenient parse used for imported records; unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "solid" => Some(Self::Solid),
            "dashed" => Some(Self::Dashed),
            "dotted" => Some(Self::Dotted),
            _ => None,
        }
    }

    /// `(dash_length, gap_length)` in pixels for a given stroke width, `None` for solid.
    pub fn pattern(&self, width: f32) -> Option<(f32, f32)> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some((6.0 + width * 2.0, 4.0 + width)),
            Self::Dotted => Some((width.max(1.0), 2.0 + width)),
        }
    }
}

/// One Fibonacci ratio with an optional per-level color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibLevel {
    pub ratio: f64,
    pub color: Option<Color32>,
}

impl FibLevel {
    pub const fn new(ratio: f64) -> Self {
        Self { ratio, color: None }
    }

    pub const fn colored(ratio: f64, color: Color32) -> Self {
        Self { ratio, color: Some(color) }
    }
}

/// Standard retracement ratios.
pub const DEFAULT_FIB_RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

pub fn default_fib_levels() -> Vec<FibLevel> {
    const COLORS: [Color32; 7] = [
        Color32::from_rgb(0x78, 0x7b, 0x86),
        Color32::from_rgb(0xf2, 0x36, 0x45),
        Color32::from_rgb(0xff, 0x98, 0x00),
        Color32::from_rgb(0x4c, 0xaf, 0x50),
        Color32::from_rgb(0x08, 0x99, 0x81),
        Color32::from_rgb(0x00, 0xbc, 0xd4),
        Color32::from_rgb(0x78, 0x7b, 0x86),
    ];
    DEFAULT_FIB_RATIOS
        .iter()
        .zip(COLORS)
        .map(|(ratio, color)| FibLevel::colored(*ratio, color))
        .collect()
}

/// Immutable visual configuration of a single drawing.
///
/// Built once when the drawing is created; every constructor clamps the values so a
/// style can never carry a width or level outside the renderable range.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingStyle {
    color: Color32,
    width: f32,
    dash: LineDash,
    show_labels: bool,
    levels: Vec<FibLevel>,
}

impl Default for DrawingStyle {
    fn default() -> Self {
        Self::new(Color32::from_rgb(0x29, 0x62, 0xff), 1.5, LineDash::Solid, true)
    }
}

impl DrawingStyle {
    pub fn new(color: Color32, width: f32, dash: LineDash, show_labels: bool) -> Self {
        Self {
            color,
            width: clamp_width(width),
            dash,
            show_labels,
            levels: Vec::new(),
        }
    }

    /// Attach a Fibonacci level set. Non-finite ratios are dropped.
    pub fn with_levels(mut self, levels: impl IntoIterator<Item = FibLevel>) -> Self {
        self.levels = levels.into_iter().filter(|l| l.ratio.is_finite()).collect();
        self
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn dash(&self) -> LineDash {
        self.dash
    }

    pub fn show_labels(&self) -> bool {
        self.show_labels
    }

    pub fn levels(&self) -> &[FibLevel] {
        &self.levels
    }

    pub fn stroke(&self) -> Stroke {
        Stroke::new(self.width, self.color)
    }

    pub fn level_color(&self, level: &FibLevel) -> Color32 {
        level.color.unwrap_or(self.color)
    }

    pub fn to_record(&self) -> StyleRecord {
        StyleRecord {
            color: Some(self.color.to_hex()),
            width: Some(self.width),
            dash: Some(self.dash.name().to_owned()),
            show_labels: Some(self.show_labels),
            levels: self
                .levels
                .iter()
                .map(|l| FibLevelRecord {
                    ratio: l.ratio,
                    color: l.color.map(|c| c.to_hex()),
                })
                .collect(),
        }
    }

    /// Build a style from an untrusted record. Missing or invalid fields fall back to
    /// `fallback`; nothing in the record is used without validation.
    pub fn from_record(record: &StyleRecord, fallback: &DrawingStyle) -> Self {
        let color = record
            .color
            .as_deref()
            .and_then(parse_color)
            .unwrap_or(fallback.color);
        let width = record
            .width
            .filter(|w| w.is_finite())
            .unwrap_or(fallback.width);
        let dash = record
            .dash
            .as_deref()
            .and_then(LineDash::from_name)
            .unwrap_or(fallback.dash);
        let show_labels = record.show_labels.unwrap_or(fallback.show_labels);

        let levels = if record.levels.is_empty() {
            fallback.levels.clone()
        } else {
            record
                .levels
                .iter()
                .map(|l| FibLevel {
                    ratio: l.ratio,
                    color: l.color.as_deref().and_then(parse_color),
                })
                .collect()
        };

        Self::new(color, width, dash, show_labels).with_levels(levels)
    }
}

fn clamp_width(width: f32) -> f32 {
    if width.is_finite() {
        width.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH)
    } else {
        MIN_LINE_WIDTH
    }
}

fn parse_color(text: &str) -> Option<Color32> {
    Color32::from_hex(text.trim()).ok()
}

/// Serialized form of [`DrawingStyle`]. Every field is optional so partial or foreign
/// records still import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_labels: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<FibLevelRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibLevelRecord {
    pub ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_is_clamped() {
        assert_eq!(DrawingStyle::new(Color32::RED, 50.0, LineDash::Solid, true).width(), MAX_LINE_WIDTH);
        assert_eq!(DrawingStyle::new(Color32::RED, -1.0, LineDash::Solid, true).width(), MIN_LINE_WIDTH);
        assert_eq!(DrawingStyle::new(Color32::RED, f32::NAN, LineDash::Solid, true).width(), MIN_LINE_WIDTH);
    }

    #[test]
    fn test_record_round_trip() {
        let style = DrawingStyle::new(Color32::from_rgb(10, 20, 30), 2.0, LineDash::Dashed, false)
            .with_levels(default_fib_levels());
        let back = DrawingStyle::from_record(&style.to_record(), &DrawingStyle::default());
        assert_eq!(back, style);
    }

    #[test]
    fn test_invalid_record_fields_fall_back() {
        let record = StyleRecord {
            color: Some("<script>".to_owned()),
            width: Some(100.0),
            dash: Some("wavy".to_owned()),
            show_labels: None,
            levels: vec![FibLevelRecord { ratio: f64::NAN, color: None }],
        };
        let fallback = DrawingStyle::default();
        let style = DrawingStyle::from_record(&record, &fallback);
        assert_eq!(style.color(), fallback.color());
        assert_eq!(style.width(), MAX_LINE_WIDTH);
        assert_eq!(style.dash(), LineDash::Solid);
        assert!(style.levels().is_empty());
    }
}
