//! Domain ⇄ screen coordinate mapping.
//!
//! Two coordinate spaces are involved:
//!
//! - **Domain coordinates** ([`DomainPoint`]): `(time, price)`, stable across pan, zoom
//!   and resize. Drawings only ever store these.
//! - **Screen coordinates** ([`egui::Pos2`]): pixels inside the current viewport.
//!   They are resolved at paint time and never cached.
//!
//! The host chart owns the mapping and exposes it through [`CoordinateMapper`]. Every
//! conversion returns `None` when the value falls outside the renderable viewport; the
//! engine treats that as "skip this element this frame", never as an error.

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A `(time, price)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DomainPoint {
    pub time: f64,
    pub price: f64,
}

impl DomainPoint {
    pub const fn new(time: f64, price: f64) -> Self {
        Self { time, price }
    }

    pub fn is_finite(&self) -> bool {
        self.time.is_finite() && self.price.is_finite()
    }
}

/// Capability supplied by the host chart surface.
pub trait CoordinateMapper {
    fn time_to_screen(&self, time: f64) -> Option<f32>;
    fn screen_to_time(&self, x: f32) -> Option<f64>;
    fn price_to_screen(&self, price: f64) -> Option<f32>;
    fn screen_to_price(&self, y: f32) -> Option<f64>;

    /// The renderable area of the chart in screen pixels.
    fn viewport(&self) -> Rect;

    fn domain_to_screen(&self, point: DomainPoint) -> Option<Pos2> {
        Some(Pos2::new(
            self.time_to_screen(point.time)?,
            self.price_to_screen(point.price)?,
        ))
    }

    fn screen_to_domain(&self, pos: Pos2) -> Option<DomainPoint> {
        Some(DomainPoint::new(
            self.screen_to_time(pos.x)?,
            self.screen_to_price(pos.y)?,
        ))
    }
}

/// Linear mapping of a visible time/price window onto a viewport rectangle.
///
/// Price grows upwards, so the top edge of the viewport is `price_max`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearMapper {
    viewport: Rect,
    time_min: f64,
    time_max: f64,
    price_min: f64,
    price_max: f64,
}

impl LinearMapper {
    pub fn new(viewport: Rect, time_range: (f64, f64), price_range: (f64, f64)) -> Self {
        Self {
            viewport,
            time_min: time_range.0.min(time_range.1),
            time_max: time_range.0.max(time_range.1),
            price_min: price_range.0.min(price_range.1),
            price_max: price_range.0.max(price_range.1),
        }
    }

    pub fn time_range(&self) -> (f64, f64) {
        (self.time_min, self.time_max)
    }

    pub fn price_range(&self) -> (f64, f64) {
        (self.price_min, self.price_max)
    }

    /// Resize the viewport while keeping the visible domain window.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Shift the visible window by a screen-space drag delta.
    pub fn pan(&mut self, delta: Vec2) {
        let (width, height) = (self.viewport.width() as f64, self.viewport.height() as f64);
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let dt = -(delta.x as f64) / width * (self.time_max - self.time_min);
        let dp = (delta.y as f64) / height * (self.price_max - self.price_min);
        self.time_min += dt;
        self.time_max += dt;
        self.price_min += dp;
        self.price_max += dp;
    }

    /// Zoom the time axis around a screen x position. `factor > 1` zooms in.
    pub fn zoom_time(&mut self, factor: f64, around_x: f32) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let Some(pivot) = self.screen_to_time(around_x) else {
            return;
        };
        self.time_min = pivot - (pivot - self.time_min) / factor;
        self.time_max = pivot + (self.time_max - pivot) / factor;
    }

    fn time_span(&self) -> f64 {
        self.time_max - self.time_min
    }

    fn price_span(&self) -> f64 {
        self.price_max - self.price_min
    }
}

impl CoordinateMapper for LinearMapper {
    fn time_to_screen(&self, time: f64) -> Option<f32> {
        if !time.is_finite() || self.time_span() <= 0.0 {
            return None;
        }
        if time < self.time_min || time > self.time_max {
            return None;
        }
        let t = (time - self.time_min) / self.time_span();
        Some(self.viewport.left() + (t * self.viewport.width() as f64) as f32)
    }

    fn screen_to_time(&self, x: f32) -> Option<f64> {
        if !self.viewport.x_range().contains(x) || self.viewport.width() <= 0.0 {
            return None;
        }
        let t = ((x - self.viewport.left()) / self.viewport.width()) as f64;
        Some(self.time_min + t * self.time_span())
    }

    fn price_to_screen(&self, price: f64) -> Option<f32> {
        if !price.is_finite() || self.price_span() <= 0.0 {
            return None;
        }
        if price < self.price_min || price > self.price_max {
            return None;
        }
        let t = (self.price_max - price) / self.price_span();
        Some(self.viewport.top() + (t * self.viewport.height() as f64) as f32)
    }

    fn screen_to_price(&self, y: f32) -> Option<f64> {
        if !self.viewport.y_range().contains(y) || self.viewport.height() <= 0.0 {
            return None;
        }
        let t = ((y - self.viewport.top()) / self.viewport.height()) as f64;
        Some(self.price_max - t * self.price_span())
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }
}
