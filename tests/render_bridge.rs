mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chart_annotations::render::{AttachedOverlayBridge, CanvasOverlayBridge, Primitive, RecordingSurface, RenderBridge};
use chart_annotations::{DrawingKind, PointerEvent};
use common::{Harness, IdentityMapper, pt};
use egui::{Pos2, Rect};

fn populate(h: &mut Harness) {
    h.manager.select_tool(DrawingKind::TrendLine).unwrap();
    h.manager.begin_drawing(pt(10.0, 10.0));
    h.manager.commit_drawing(pt(200.0, 120.0));
    h.manager.select_tool(DrawingKind::HorizontalLine).unwrap();
    h.manager.begin_drawing(pt(50.0, 75.0));
    h.manager.commit_drawing(pt(50.0, 75.0));
    h.manager.select_tool(DrawingKind::FibRetracement).unwrap();
    h.manager.begin_drawing(pt(20.0, 100.0));
    h.manager.commit_drawing(pt(300.0, 300.0));
    // Leave a gesture open so the in-progress drawing is painted too
    h.manager.select_tool(DrawingKind::TrendLine).unwrap();
    h.manager.begin_drawing(pt(0.0, 0.0));
    h.manager.update_drawing(pt(80.0, 40.0));
}

fn paint(h: &mut Harness, mapper: &IdentityMapper) -> RecordingSurface {
    let mut surface = RecordingSurface::new();
    h.manager.paint(&mut surface, mapper);
    surface
}

#[test]
fn test_bridges_paint_identical_primitives() {
    let mapper = IdentityMapper::default();
    let mut attached = Harness::with_bridge(Box::new(AttachedOverlayBridge::new(None)));
    let mut canvas = Harness::with_bridge(Box::new(CanvasOverlayBridge::new(None)));
    populate(&mut attached);
    populate(&mut canvas);

    let a = paint(&mut attached, &mapper);
    let b = paint(&mut canvas, &mapper);
    assert!(!a.is_empty());
    assert_eq!(a.primitives(), b.primitives());
}

#[test]
fn test_in_progress_drawing_is_painted_last() {
    let mapper = IdentityMapper::default();
    let mut h = Harness::new();
    populate(&mut h);

    let surface = paint(&mut h, &mapper);
    let last_segment = surface.segments().last().unwrap();
    assert_eq!(last_segment, (Pos2::new(0.0, 0.0), Pos2::new(80.0, 40.0)));
}

#[test]
fn test_removed_drawing_is_not_painted() {
    let mapper = IdentityMapper::default();
    let mut h = Harness::new();
    h.manager.select_tool(DrawingKind::HorizontalLine).unwrap();
    h.manager.begin_drawing(pt(0.0, 40.0));
    let id = h.manager.commit_drawing(pt(0.0, 40.0)).unwrap();
    assert!(!paint(&mut h, &mapper).is_empty());

    h.manager.remove_drawing(id);
    assert!(paint(&mut h, &mapper).is_empty());
    assert_eq!(h.manager.bridge().attached_count(), 0);
}

#[test]
fn test_paint_follows_viewport() {
    let mut h = Harness::new();
    h.manager.select_tool(DrawingKind::HorizontalLine).unwrap();
    h.manager.begin_drawing(pt(0.0, 40.0));
    h.manager.commit_drawing(pt(0.0, 40.0));

    let narrow = IdentityMapper::with_viewport(Rect::from_min_max(Pos2::ZERO, Pos2::new(100.0, 100.0)));
    let wide = IdentityMapper::with_viewport(Rect::from_min_max(Pos2::ZERO, Pos2::new(400.0, 100.0)));
    let first = paint(&mut h, &narrow).segments().next().unwrap();
    let second = paint(&mut h, &wide).segments().next().unwrap();
    assert_eq!(first.1.x, 100.0);
    assert_eq!(second.1.x, 400.0);

    // Scrolled out of view: nothing is drawn this frame
    let below = IdentityMapper::with_viewport(Rect::from_min_max(Pos2::new(0.0, 500.0), Pos2::new(400.0, 600.0)));
    assert!(paint(&mut h, &below).is_empty());
}

#[test]
fn test_canvas_resyncs_on_viewport_change() {
    let mut bridge = CanvasOverlayBridge::new(None);
    let registry = chart_annotations::ToolRegistry::with_defaults(&Default::default());
    let mut surface = RecordingSurface::new();
    for width in [100.0, 100.0, 250.0] {
        let mapper = IdentityMapper::with_viewport(Rect::from_min_max(Pos2::ZERO, Pos2::new(width, 100.0)));
        let scene = chart_annotations::render::Scene {
            drawings: &[],
            in_progress: None,
            registry: &registry,
            mapper: &mapper,
        };
        bridge.paint(&scene, &mut surface);
    }
    assert_eq!(bridge.resyncs(), 2);
    assert!(surface.is_empty());
}

#[test]
fn test_drag_repaints_coalesce_per_frame() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let bridge = AttachedOverlayBridge::new(Some(Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })));
    let mut h = Harness::with_bridge(Box::new(bridge));
    let mapper = IdentityMapper::default();
    h.manager.select_tool(DrawingKind::TrendLine).unwrap();

    h.manager.handle_pointer(PointerEvent::Down(Pos2::new(0.0, 0.0)), &mapper);
    for x in 1..20 {
        h.manager.handle_pointer(PointerEvent::Move(Pos2::new(x as f32, 5.0)), &mapper);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(h.manager.begin_frame());
    h.manager.handle_pointer(PointerEvent::Move(Pos2::new(30.0, 5.0)), &mapper);
    h.manager.handle_pointer(PointerEvent::Up(Pos2::new(31.0, 5.0)), &mapper);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(h.manager.bridge().scheduler().host_requests(), 2);

    // Unused frames do not trigger anything
    assert!(h.manager.begin_frame());
    assert!(!h.manager.begin_frame());
    assert!(matches!(paint(&mut h, &mapper).primitives()[0], Primitive::Segment { .. }));
}
