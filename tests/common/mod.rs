#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chart_annotations::coords::{CoordinateMapper, DomainPoint};
use chart_annotations::event::{AnnotationEvent, EventBus};
use chart_annotations::navigation::NavigationLock;
use chart_annotations::render::{AttachedOverlayBridge, RenderBridge};
use chart_annotations::{DrawingManager, EngineConfig};
use egui::{Pos2, Rect};
use parking_lot::Mutex;

/// time = x, price = y; anything outside the viewport is unresolved.
pub struct IdentityMapper {
    pub viewport: Rect,
}

impl Default for IdentityMapper {
    fn default() -> Self {
        Self {
            viewport: Rect::from_min_max(Pos2::new(-1000.0, -1000.0), Pos2::new(1000.0, 1000.0)),
        }
    }
}

impl IdentityMapper {
    pub fn with_viewport(viewport: Rect) -> Self {
        Self { viewport }
    }
}

impl CoordinateMapper for IdentityMapper {
    fn time_to_screen(&self, time: f64) -> Option<f32> {
        let x = time as f32;
        self.viewport.x_range().contains(x).then_some(x)
    }

    fn screen_to_time(&self, x: f32) -> Option<f64> {
        self.viewport.x_range().contains(x).then_some(x as f64)
    }

    fn price_to_screen(&self, price: f64) -> Option<f32> {
        let y = price as f32;
        self.viewport.y_range().contains(y).then_some(y)
    }

    fn screen_to_price(&self, y: f32) -> Option<f64> {
        self.viewport.y_range().contains(y).then_some(y as f64)
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }
}

pub fn pt(time: f64, price: f64) -> DomainPoint {
    DomainPoint::new(time, price)
}

/// A manager wired to a recorded event log and an observable navigation flag.
pub struct Harness {
    pub manager: DrawingManager,
    pub navigation: NavigationLock,
    pub navigation_enabled: Arc<AtomicBool>,
    pub events: Arc<Mutex<Vec<AnnotationEvent>>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_bridge(Box::new(AttachedOverlayBridge::new(None)))
    }

    pub fn with_bridge(bridge: Box<dyn RenderBridge>) -> Self {
        let navigation_enabled = Arc::new(AtomicBool::new(true));
        let flag = navigation_enabled.clone();
        let navigation = NavigationLock::new(Some(Box::new(move |on| flag.store(on, Ordering::SeqCst))));

        let events = Arc::new(Mutex::new(Vec::new()));
        let log = events.clone();
        let bus = Arc::new(EventBus::new());
        bus.subscribe(Box::new(move |event: &AnnotationEvent| log.lock().push(event.clone())));

        let manager = DrawingManager::new(EngineConfig::default(), bridge, bus, navigation.clone());
        Self {
            manager,
            navigation,
            navigation_enabled,
            events,
        }
    }

    pub fn navigation_enabled(&self) -> bool {
        self.navigation_enabled.load(Ordering::SeqCst)
    }

    pub fn take_events(&self) -> Vec<AnnotationEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}
