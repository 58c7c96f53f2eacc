mod common;

use chart_annotations::event::AnnotationEvent;
use chart_annotations::tools::ToolRegistry;
use chart_annotations::{DrawingKind, Phase, PointerEvent, ToolError, ToolSelection};
use common::{Harness, IdentityMapper, pt};
use egui::{Pos2, Rect};

#[test]
fn test_reselecting_active_tool_returns_to_idle() {
    let mut h = Harness::new();
    assert_eq!(h.manager.phase(), Phase::Idle);

    let selection = h.manager.select_tool(DrawingKind::TrendLine).unwrap();
    assert_eq!(selection, ToolSelection::Activated(DrawingKind::TrendLine));
    assert_eq!(h.manager.phase(), Phase::Armed);
    assert_eq!(h.manager.active_tool(), Some(DrawingKind::TrendLine));

    let selection = h.manager.select_tool(DrawingKind::TrendLine).unwrap();
    assert_eq!(selection, ToolSelection::Deactivated(DrawingKind::TrendLine));
    assert_eq!(h.manager.phase(), Phase::Idle);
    assert_eq!(h.manager.active_tool(), None);
}

#[test]
fn test_switching_tools_deactivates_previous() {
    let mut h = Harness::new();
    h.manager.select_tool(DrawingKind::TrendLine).unwrap();
    h.take_events();

    h.manager.select_tool_named("FibRetracement").unwrap();
    assert_eq!(h.manager.active_tool(), Some(DrawingKind::FibRetracement));
    assert_eq!(
        h.take_events(),
        vec![
            AnnotationEvent::ToolDeactivated { kind: DrawingKind::TrendLine },
            AnnotationEvent::ToolActivated { kind: DrawingKind::FibRetracement },
        ]
    );
}

#[test]
fn test_unknown_tool_leaves_state_unchanged() {
    let mut h = Harness::new();
    h.manager.select_tool(DrawingKind::HorizontalLine).unwrap();

    let result = h.manager.select_tool_named("Pitchfork");
    assert_eq!(result, Err(ToolError::UnknownKind("Pitchfork".to_owned())));
    assert_eq!(h.manager.phase(), Phase::Armed);
    assert_eq!(h.manager.active_tool(), Some(DrawingKind::HorizontalLine));
}

#[test]
fn test_unregistered_tool_is_an_error() {
    let h = Harness::new();
    let mut manager = h.manager.with_registry(ToolRegistry::new());

    let result = manager.select_tool(DrawingKind::TrendLine);
    assert_eq!(result, Err(ToolError::NotRegistered(DrawingKind::TrendLine)));
    assert_eq!(manager.phase(), Phase::Idle);
}

#[test]
fn test_pointer_down_without_tool_is_ignored() {
    let mut h = Harness::new();
    let mapper = IdentityMapper::default();

    assert!(!h.manager.handle_pointer(PointerEvent::Down(Pos2::new(10.0, 10.0)), &mapper));
    assert_eq!(h.manager.phase(), Phase::Idle);
    assert!(h.manager.in_progress().is_none());
    assert_eq!(h.navigation.acquisitions(), 0);
}

#[test]
fn test_full_gesture_commits_drawing() {
    let mut h = Harness::new();
    let mapper = IdentityMapper::default();
    h.manager.select_tool(DrawingKind::TrendLine).unwrap();

    h.manager.handle_pointer(PointerEvent::Down(Pos2::new(10.0, 20.0)), &mapper);
    assert_eq!(h.manager.phase(), Phase::Drawing);
    assert!(h.navigation.is_held());
    assert!(!h.navigation_enabled());

    h.manager.handle_pointer(PointerEvent::Move(Pos2::new(50.0, 60.0)), &mapper);
    assert_eq!(h.manager.in_progress().unwrap().anchors(), &[pt(10.0, 20.0), pt(50.0, 60.0)]);

    h.manager.handle_pointer(PointerEvent::Up(Pos2::new(90.0, 80.0)), &mapper);
    assert_eq!(h.manager.phase(), Phase::Armed);
    assert_eq!(h.manager.len(), 1);

    let drawing = &h.manager.drawings()[0];
    let id = drawing.id().unwrap();
    assert_eq!(drawing.anchors(), &[pt(10.0, 20.0), pt(90.0, 80.0)]);
    assert!(h.manager.bridge().is_attached(id));

    assert!(!h.navigation.is_held());
    assert!(h.navigation_enabled());
    assert_eq!((h.navigation.acquisitions(), h.navigation.releases()), (1, 1));
}

#[test]
fn test_pointer_leave_discards_gesture() {
    let mut h = Harness::new();
    let mapper = IdentityMapper::default();
    h.manager.select_tool(DrawingKind::FibRetracement).unwrap();
    h.take_events();

    h.manager.handle_pointer(PointerEvent::Down(Pos2::new(0.0, 100.0)), &mapper);
    h.manager.handle_pointer(PointerEvent::Move(Pos2::new(40.0, 200.0)), &mapper);
    h.manager.handle_pointer(PointerEvent::Leave, &mapper);

    assert!(h.manager.is_empty());
    assert_eq!(h.manager.phase(), Phase::Armed);
    assert_eq!((h.navigation.acquisitions(), h.navigation.releases()), (1, 1));
    assert_eq!(
        h.take_events(),
        vec![
            AnnotationEvent::GestureStarted { kind: DrawingKind::FibRetracement },
            AnnotationEvent::GestureCancelled { kind: DrawingKind::FibRetracement },
        ]
    );
}

#[test]
fn test_deselect_mid_gesture_releases_navigation() {
    let mut h = Harness::new();
    h.manager.select_tool(DrawingKind::TrendLine).unwrap();
    assert!(h.manager.begin_drawing(pt(1.0, 1.0)));

    assert!(h.manager.deselect_tool());
    assert_eq!(h.manager.phase(), Phase::Idle);
    assert!(h.manager.is_empty());
    assert_eq!(h.navigation.releases(), 1);
    assert!(h.navigation_enabled());
}

#[test]
fn test_selecting_tool_mid_gesture_is_ignored() {
    let mut h = Harness::new();
    h.manager.select_tool(DrawingKind::TrendLine).unwrap();
    h.manager.begin_drawing(pt(1.0, 1.0));

    assert_eq!(h.manager.select_tool(DrawingKind::HorizontalLine), Ok(ToolSelection::Ignored));
    assert_eq!(h.manager.select_tool(DrawingKind::TrendLine), Ok(ToolSelection::Ignored));
    assert_eq!(h.manager.phase(), Phase::Drawing);
    assert_eq!(h.navigation.acquisitions(), 1);

    assert!(h.manager.commit_drawing(pt(5.0, 5.0)).is_some());
    assert_eq!(h.navigation.releases(), 1);
}

#[test]
fn test_navigation_released_once_per_gesture() {
    let mut h = Harness::new();
    h.manager.select_tool(DrawingKind::HorizontalLine).unwrap();

    for i in 0..3 {
        h.manager.begin_drawing(pt(i as f64, 10.0));
        // A second pointer-down during the gesture must not re-acquire
        h.manager.begin_drawing(pt(i as f64, 20.0));
        h.manager.commit_drawing(pt(i as f64, 30.0));
        h.manager.commit_drawing(pt(i as f64, 40.0));
    }
    h.manager.begin_drawing(pt(0.0, 0.0));
    h.manager.cancel_drawing();
    h.manager.cancel_drawing();

    assert_eq!(h.manager.len(), 3);
    assert_eq!((h.navigation.acquisitions(), h.navigation.releases()), (4, 4));
    assert!(!h.navigation.is_held());
}

#[test]
fn test_destroy_mid_gesture_releases_navigation() {
    let mut h = Harness::new();
    h.manager.select_tool(DrawingKind::TrendLine).unwrap();
    h.manager.begin_drawing(pt(0.0, 0.0));
    h.manager.commit_drawing(pt(10.0, 10.0));
    h.manager.begin_drawing(pt(0.0, 0.0));

    h.manager.destroy();
    assert_eq!(h.manager.phase(), Phase::Idle);
    assert!(h.manager.is_empty());
    assert_eq!(h.manager.bridge().attached_count(), 0);
    assert!(!h.navigation.is_held());
}

#[test]
fn test_unresolved_pointer_up_keeps_last_anchor() {
    let mut h = Harness::new();
    let mapper = IdentityMapper::with_viewport(Rect::from_min_max(Pos2::ZERO, Pos2::new(100.0, 100.0)));
    h.manager.select_tool(DrawingKind::TrendLine).unwrap();

    h.manager.handle_pointer(PointerEvent::Down(Pos2::new(10.0, 10.0)), &mapper);
    h.manager.handle_pointer(PointerEvent::Move(Pos2::new(40.0, 40.0)), &mapper);
    // Unresolved moves are swallowed without touching the drawing
    assert!(h.manager.handle_pointer(PointerEvent::Move(Pos2::new(400.0, 40.0)), &mapper));
    h.manager.handle_pointer(PointerEvent::Up(Pos2::new(500.0, 500.0)), &mapper);

    assert_eq!(h.manager.drawings()[0].anchors(), &[pt(10.0, 10.0), pt(40.0, 40.0)]);
    assert!(!h.navigation.is_held());
}

#[test]
fn test_hover_tracks_topmost_drawing() {
    let mut h = Harness::new();
    let mapper = IdentityMapper::default();
    h.manager.select_tool(DrawingKind::HorizontalLine).unwrap();
    h.manager.begin_drawing(pt(0.0, 50.0));
    let lower = h.manager.commit_drawing(pt(0.0, 50.0)).unwrap();
    h.manager.begin_drawing(pt(0.0, 52.0));
    let upper = h.manager.commit_drawing(pt(0.0, 52.0)).unwrap();
    h.manager.deselect_tool();
    h.take_events();

    h.manager.handle_pointer(PointerEvent::Move(Pos2::new(30.0, 51.0)), &mapper);
    assert_eq!(h.manager.hovered(), Some(upper));
    h.manager.handle_pointer(PointerEvent::Move(Pos2::new(30.0, 45.0)), &mapper);
    assert_eq!(h.manager.hovered(), Some(lower));
    h.manager.handle_pointer(PointerEvent::Leave, &mapper);
    assert_eq!(h.manager.hovered(), None);

    assert_eq!(
        h.take_events(),
        vec![
            AnnotationEvent::HoverChanged { id: Some(upper) },
            AnnotationEvent::HoverChanged { id: Some(lower) },
            AnnotationEvent::HoverChanged { id: None },
        ]
    );
}
