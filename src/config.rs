use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::drawing::{DrawingKind, DrawingStyle, FibLevelRecord, LineDash, StyleRecord, default_fib_levels};
use crate::error::ConfigError;

/// Price snapping applied while a gesture moves an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    pub enabled: bool,
    pub decimals: u32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            decimals: 2,
        }
    }
}

impl SnapConfig {
    pub const MAX_DECIMALS: u32 = 10;

    pub fn apply(&self, price: f64) -> f64 {
        if self.enabled {
            crate::geometry::snap_price(price, self.decimals)
        } else {
            price
        }
    }
}

/// Engine-wide settings, loaded once at startup.
///
/// Every field has a default, so a partial JSON document is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub snap: SnapConfig,
    /// Hit-test radius in pixels.
    pub hit_tolerance: f32,
    /// Below this on-screen extent (pixels) only the primary geometry is drawn.
    pub min_decoration_extent: f32,
    /// Style overrides for new drawings. Unset fields keep the per-kind defaults;
    /// `levels` is ignored here.
    pub style: StyleRecord,
    pub fib_levels: Vec<FibLevelRecord>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snap: SnapConfig::default(),
            hit_tolerance: 6.0,
            min_decoration_extent: 12.0,
            style: StyleRecord::default(),
            fib_levels: DrawingStyle::default()
                .with_levels(default_fib_levels())
                .to_record()
                .levels,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp numeric settings into usable ranges.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        self.snap.decimals = self.snap.decimals.min(SnapConfig::MAX_DECIMALS);
        if !(self.hit_tolerance.is_finite() && self.hit_tolerance > 0.0) {
            log::warn!("Invalid hit tolerance {}, using default", self.hit_tolerance);
            self.hit_tolerance = defaults.hit_tolerance;
        }
        if !(self.min_decoration_extent.is_finite() && self.min_decoration_extent >= 0.0) {
            self.min_decoration_extent = defaults.min_decoration_extent;
        }
        self.fib_levels.retain(|l| l.ratio.is_finite());
        if self.fib_levels.is_empty() {
            self.fib_levels = defaults.fib_levels;
        }
        self
    }

    /// The immutable style handed to a drawing of `kind` at creation time.
    pub fn style_for(&self, kind: DrawingKind) -> DrawingStyle {
        let record = StyleRecord {
            levels: match kind {
                DrawingKind::FibRetracement => self.fib_levels.clone(),
                _ => Vec::new(),
            },
            ..self.style.clone()
        };
        let fallback = match kind {
            DrawingKind::HorizontalLine => {
                DrawingStyle::new(Color32::from_rgb(0xff, 0x98, 0x00), 1.0, LineDash::Dashed, true)
            }
            _ => DrawingStyle::default(),
        };
        DrawingStyle::from_record(&record, &fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{ "hit_tolerance": 9.0 }"#).unwrap();
        assert_eq!(config.hit_tolerance, 9.0);
        assert_eq!(config.snap, SnapConfig::default());
        assert_eq!(config.fib_levels.len(), 7);
    }

    #[test]
    fn test_invalid_values_are_clamped() {
        let config = EngineConfig::from_json(
            r#"{ "hit_tolerance": -3.0, "snap": { "decimals": 99 }, "fib_levels": [] }"#,
        )
        .unwrap();
        assert_eq!(config.hit_tolerance, 6.0);
        assert_eq!(config.snap.decimals, SnapConfig::MAX_DECIMALS);
        assert_eq!(config.fib_levels.len(), 7);
    }

    #[test]
    fn test_fib_style_carries_levels() {
        let config = EngineConfig::default();
        assert_eq!(config.style_for(DrawingKind::FibRetracement).levels().len(), 7);
        assert!(config.style_for(DrawingKind::TrendLine).levels().is_empty());
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(EngineConfig::from_json("{ nope").is_err());
    }
}
