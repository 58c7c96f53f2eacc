//! The persisted annotation entity.

mod style;

pub use style::{
    DEFAULT_FIB_RATIOS, DrawingStyle, FibLevel, FibLevelRecord, LineDash, MAX_LINE_WIDTH,
    MIN_LINE_WIDTH, StyleRecord, default_fib_levels,
};

use crate::coords::DomainPoint;
use crate::error::ToolError;
use crate::id_generator::DrawingId;

/// Annotation kinds known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DrawingKind {
    TrendLine,
    HorizontalLine,
    FibRetracement,
}

impl DrawingKind {
    /// Tag used in the persistence format and for named tool lookup.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TrendLine => "TrendLine",
            Self::HorizontalLine => "HorizontalLine",
            Self::FibRetracement => "FibRetracement",
        }
    }

    /// Number of anchors a finished drawing of this kind carries.
    pub fn anchor_count(&self) -> usize {
        match self {
            Self::HorizontalLine => 1,
            Self::TrendLine | Self::FibRetracement => 2,
        }
    }

    pub fn all() -> &'static [DrawingKind] {
        &[Self::TrendLine, Self::HorizontalLine, Self::FibRetracement]
    }
}

impl std::fmt::Display for DrawingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for DrawingKind {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ToolError::UnknownKind(s.to_owned()))
    }
}

/// Derived values of a trend line, all in domain units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendMetrics {
    pub time_delta: f64,
    pub price_delta: f64,
    /// Relative to the start price; `None` when the start price is zero.
    pub percent_change: Option<f64>,
    pub length: f64,
    pub angle_degrees: f64,
}

/// One row of a Fibonacci level table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelValue {
    pub ratio: f64,
    pub price: f64,
}

/// Kind-specific values computed from anchors and style.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Derived {
    /// Anchors changed since the last computation.
    #[default]
    Pending,
    TrendLine(TrendMetrics),
    HorizontalLine { price: f64 },
    FibRetracement { levels: Vec<LevelValue> },
}

/// A chart annotation anchored in domain coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    id: Option<DrawingId>,
    kind: DrawingKind,
    anchors: Vec<DomainPoint>,
    style: DrawingStyle,
    derived: Derived,
    created_at: u64,
}

impl Drawing {
    pub fn new(kind: DrawingKind, anchors: Vec<DomainPoint>, style: DrawingStyle, created_at: u64) -> Self {
        Self {
            id: None,
            kind,
            anchors,
            style,
            derived: Derived::Pending,
            created_at,
        }
    }

    /// `None` until the drawing is committed to a collection.
    pub fn id(&self) -> Option<DrawingId> {
        self.id
    }

    pub fn kind(&self) -> DrawingKind {
        self.kind
    }

    pub fn anchors(&self) -> &[DomainPoint] {
        &self.anchors
    }

    pub fn style(&self) -> &DrawingStyle {
        &self.style
    }

    pub fn derived(&self) -> &Derived {
        &self.derived
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Mutable access to the anchors. Marks derived data stale.
    pub fn anchors_mut(&mut self) -> &mut Vec<DomainPoint> {
        self.derived = Derived::Pending;
        &mut self.anchors
    }

    /// The anchor a drag gesture moves. Marks derived data stale.
    pub fn trailing_anchor_mut(&mut self) -> Option<&mut DomainPoint> {
        self.derived = Derived::Pending;
        self.anchors.last_mut()
    }

    pub fn set_derived(&mut self, derived: Derived) {
        self.derived = derived;
    }

    pub fn is_committed(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn assign_id(&mut self, id: DrawingId) {
        self.id = Some(id);
    }
}
