use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use egui::{Pos2, Rect, Vec2};

use crate::config::EngineConfig;
use crate::coords::{DomainPoint, LinearMapper};
use crate::event::EventBus;
use crate::input::InputHandler;
use crate::manager::DrawingManager;
use crate::navigation::NavigationLock;
use crate::panels::{central_panel, tools_panel};
use crate::render::{AttachedOverlayBridge, RepaintHook};

/// Storage key for the exported drawings.
pub const DRAWINGS_KEY: &str = "chart_annotations.drawings";

const SERIES_LEN: usize = 240;

/// Demo host: a synthetic price series on a pannable chart with the annotation tools.
pub struct ChartApp {
    manager: DrawingManager,
    mapper: LinearMapper,
    input: InputHandler,
    navigation_enabled: Arc<AtomicBool>,
    series: Vec<DomainPoint>,
}

impl Default for ChartApp {
    fn default() -> Self {
        Self::with_repaint(None)
    }
}

impl ChartApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let ctx = cc.egui_ctx.clone();
        let mut app = Self::with_repaint(Some(Box::new(move || ctx.request_repaint())));

        if let Some(json) = cc.storage.and_then(|storage| storage.get_string(DRAWINGS_KEY)) {
            match app.manager.restore_all(&json) {
                Ok(report) => log::info!("Restored {} drawings", report.imported_count()),
                Err(err) => log::warn!("Could not restore drawings: {}", err),
            }
        }
        app
    }

    pub fn with_repaint(repaint: Option<RepaintHook>) -> Self {
        let navigation_enabled = Arc::new(AtomicBool::new(true));
        let flag = navigation_enabled.clone();
        let navigation = NavigationLock::new(Some(Box::new(move |enabled| flag.store(enabled, Ordering::SeqCst))));

        let events = Arc::new(EventBus::new());
        events.subscribe(Box::new(|event: &crate::event::AnnotationEvent| log::debug!("{:?}", event)));

        let manager = DrawingManager::new(
            EngineConfig::default(),
            Box::new(AttachedOverlayBridge::new(repaint)),
            events,
            navigation,
        );

        let series = synthetic_series(SERIES_LEN);
        let (low, high) = series
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.price), hi.max(p.price)));
        let margin = (high - low) * 0.1;
        let mapper = LinearMapper::new(
            Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
            (0.0, SERIES_LEN as f64),
            (low - margin, high + margin),
        );

        Self {
            manager,
            mapper,
            input: InputHandler::new(),
            navigation_enabled,
            series,
        }
    }

    pub fn manager(&self) -> &DrawingManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut DrawingManager {
        &mut self.manager
    }

    pub fn mapper(&self) -> &LinearMapper {
        &self.mapper
    }

    pub(crate) fn mapper_mut(&mut self) -> &mut LinearMapper {
        &mut self.mapper
    }

    pub fn series(&self) -> &[DomainPoint] {
        &self.series
    }

    /// False while a gesture holds the navigation lock.
    pub fn navigation_enabled(&self) -> bool {
        self.navigation_enabled.load(Ordering::SeqCst)
    }

    /// Forward this frame's pointer input over `rect` to the manager.
    pub(crate) fn handle_input(&mut self, ctx: &egui::Context, rect: Rect) {
        self.mapper.set_viewport(rect);
        self.input.set_chart_rect(rect);
        for event in self.input.process_input(ctx) {
            self.manager.handle_pointer(event, &self.mapper);
        }
    }
}

/// Deterministic random-walk-like price series.
fn synthetic_series(len: usize) -> Vec<DomainPoint> {
    (0..len)
        .map(|i| {
            let t = i as f64;
            let price = 100.0 + 0.15 * t + 8.0 * (t / 9.0).sin() + 3.0 * (t / 2.3).cos();
            DomainPoint::new(t, price)
        })
        .collect()
}

impl eframe::App for ChartApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.manager.export_json() {
            Ok(json) => storage.set_string(DRAWINGS_KEY, json),
            Err(err) => log::warn!("Could not save drawings: {}", err),
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.manager.destroy();
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.manager.begin_frame();
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
