use std::collections::HashSet;

use egui::Rect;

use super::surface::{OverlaySurface, RecordingSurface};
use crate::coords::CoordinateMapper;
use crate::drawing::Drawing;
use crate::id_generator::DrawingId;
use crate::tools::ToolRegistry;

/// Host callback that schedules a repaint of the chart.
pub type RepaintHook = Box<dyn FnMut() + Send>;

/// Everything a bridge needs to paint one frame.
pub struct Scene<'a> {
    /// Committed drawings in z-order.
    pub drawings: &'a [Drawing],
    pub in_progress: Option<&'a Drawing>,
    pub registry: &'a ToolRegistry,
    pub mapper: &'a dyn CoordinateMapper,
}

/// Coalesces repaint requests to at most one host repaint per frame.
pub struct RepaintScheduler {
    pending: bool,
    host_requests: u64,
    hook: Option<RepaintHook>,
}

impl std::fmt::Debug for RepaintScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepaintScheduler")
            .field("pending", &self.pending)
            .field("host_requests", &self.host_requests)
            .finish_non_exhaustive()
    }
}

impl Default for RepaintScheduler {
    fn default() -> Self {
        Self::new(None)
    }
}

impl RepaintScheduler {
    pub fn new(hook: Option<RepaintHook>) -> Self {
        Self {
            pending: false,
            host_requests: 0,
            hook,
        }
    }

    pub fn request(&mut self) {
        if self.pending {
            return;
        }
        self.pending = true;
        self.host_requests += 1;
        if let Some(hook) = self.hook.as_mut() {
            hook();
        }
    }

    /// Start of a host frame. Returns whether a repaint had been requested.
    pub fn begin_frame(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// How many times the host was actually asked to repaint.
    pub fn host_requests(&self) -> u64 {
        self.host_requests
    }
}

/// Adapts committed drawings into the host's overlay mechanism.
pub trait RenderBridge {
    fn attach(&mut self, id: DrawingId);
    fn detach(&mut self, id: DrawingId);
    fn is_attached(&self, id: DrawingId) -> bool;
    fn attached_count(&self) -> usize;

    fn scheduler(&self) -> &RepaintScheduler;
    fn scheduler_mut(&mut self) -> &mut RepaintScheduler;

    fn request_repaint(&mut self) {
        self.scheduler_mut().request();
    }

    fn begin_frame(&mut self) -> bool {
        self.scheduler_mut().begin_frame()
    }

    fn paint(&mut self, scene: &Scene<'_>, surface: &mut dyn OverlaySurface);
}

fn paint_scene(scene: &Scene<'_>, attached: &HashSet<DrawingId>, surface: &mut dyn OverlaySurface) {
    let committed = scene
        .drawings
        .iter()
        .filter(|d| d.id().is_some_and(|id| attached.contains(&id)));

    for drawing in committed.chain(scene.in_progress) {
        match scene.registry.get(drawing.kind()) {
            Ok(tool) => tool.render(surface, drawing, scene.mapper),
            Err(err) => log::debug!("Skipping drawing: {err}"),
        }
    }
}

/// Paints every attached drawing directly inside the host's own render pass.
///
/// Clipping, scale and repaint scheduling come from the host.
#[derive(Debug, Default)]
pub struct AttachedOverlayBridge {
    hooks: HashSet<DrawingId>,
    scheduler: RepaintScheduler,
}

impl AttachedOverlayBridge {
    pub fn new(repaint: Option<RepaintHook>) -> Self {
        Self {
            hooks: HashSet::new(),
            scheduler: RepaintScheduler::new(repaint),
        }
    }
}

impl RenderBridge for AttachedOverlayBridge {
    fn attach(&mut self, id: DrawingId) {
        if self.hooks.insert(id) {
            self.scheduler.request();
        }
    }

    fn detach(&mut self, id: DrawingId) {
        if self.hooks.remove(&id) {
            self.scheduler.request();
        }
    }

    fn is_attached(&self, id: DrawingId) -> bool {
        self.hooks.contains(&id)
    }

    fn attached_count(&self) -> usize {
        self.hooks.len()
    }

    fn scheduler(&self) -> &RepaintScheduler {
        &self.scheduler
    }

    fn scheduler_mut(&mut self) -> &mut RepaintScheduler {
        &mut self.scheduler
    }

    fn paint(&mut self, scene: &Scene<'_>, surface: &mut dyn OverlaySurface) {
        paint_scene(scene, &self.hooks, surface);
    }
}

/// Fallback for hosts without an overlay hook: draws into a separate back buffer sized
/// to the viewport and replays it onto the target.
///
/// The buffer is resynchronised whenever the viewport changes.
#[derive(Debug, Default)]
pub struct CanvasOverlayBridge {
    hooks: HashSet<DrawingId>,
    scheduler: RepaintScheduler,
    viewport: Option<Rect>,
    back_buffer: RecordingSurface,
    resyncs: u64,
}

impl CanvasOverlayBridge {
    pub fn new(repaint: Option<RepaintHook>) -> Self {
        Self {
            scheduler: RepaintScheduler::new(repaint),
            ..Default::default()
        }
    }

    /// Number of times the buffer was rebuilt for a new viewport.
    pub fn resyncs(&self) -> u64 {
        self.resyncs
    }

    fn sync_viewport(&mut self, viewport: Rect) {
        if self.viewport != Some(viewport) {
            log::debug!("Overlay canvas resized to {:?}", viewport.size());
            self.viewport = Some(viewport);
            self.resyncs += 1;
        }
    }
}

impl RenderBridge for CanvasOverlayBridge {
    fn attach(&mut self, id: DrawingId) {
        if self.hooks.insert(id) {
            self.scheduler.request();
        }
    }

    fn detach(&mut self, id: DrawingId) {
        if self.hooks.remove(&id) {
            self.scheduler.request();
        }
    }

    fn is_attached(&self, id: DrawingId) -> bool {
        self.hooks.contains(&id)
    }

    fn attached_count(&self) -> usize {
        self.hooks.len()
    }

    fn scheduler(&self) -> &RepaintScheduler {
        &self.scheduler
    }

    fn scheduler_mut(&mut self) -> &mut RepaintScheduler {
        &mut self.scheduler
    }

    fn paint(&mut self, scene: &Scene<'_>, surface: &mut dyn OverlaySurface) {
        self.sync_viewport(scene.mapper.viewport());
        self.back_buffer.clear();
        paint_scene(scene, &self.hooks, &mut self.back_buffer);
        self.back_buffer.replay(surface);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_repaints_coalesce_per_frame() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut scheduler = RepaintScheduler::new(Some(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })));

        scheduler.request();
        scheduler.request();
        scheduler.request();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(scheduler.begin_frame());
        assert!(!scheduler.begin_frame());

        scheduler.request();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.host_requests(), 2);
    }

    #[test]
    fn test_detach_unknown_id_is_quiet() {
        let mut bridge = AttachedOverlayBridge::new(None);
        bridge.detach(crate::id_generator::generate_id());
        assert_eq!(bridge.attached_count(), 0);
        assert!(!bridge.scheduler().is_pending());
    }
}
