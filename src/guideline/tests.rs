//! Unit tests for the guideline state machine

use std::collections::HashSet;

use crate::document::{ColorPalette, CoordsType};
use crate::geometry::{Edge, SceneRect, ScenePoint};
use crate::guideline::{
    Guideline, GuidelineContext, GuidelineId, GuidelineShape, GuidelineState, SNAP_TOLERANCE,
};
use crate::scene::{Scene, SceneLog, SurfaceKind};
use crate::transform::Transformation;

fn test_rect() -> SceneRect {
    SceneRect::new(0.0, 0.0, 800.0, 600.0)
}

fn ctx<'a>(scene: &'a mut dyn Scene, transformation: Transformation) -> GuidelineContext<'a> {
    GuidelineContext {
        transformation,
        coords_type: CoordsType::Cartesian,
        color: ColorPalette::Blue,
        scene_rect: test_rect(),
        scene,
    }
}

fn lurking_left(scene: &mut dyn Scene, transformation: Transformation) -> Guideline {
    let mut ctx = ctx(scene, transformation);
    Guideline::new(GuidelineId(0), GuidelineState::Lurking(Edge::Left), &mut ctx)
}

#[test]
fn test_state_names_unique_and_non_empty() {
    let mut names = HashSet::new();
    for edge in Edge::ALL {
        for state in [
            GuidelineState::Lurking(edge),
            GuidelineState::Hidden(edge),
            GuidelineState::DeployedUnlocked(edge),
            GuidelineState::DeployedLocked(edge),
        ] {
            let name = state.state_name();
            assert!(!name.is_empty());
            assert!(names.insert(name), "duplicate state name {name}");
        }
    }
    assert_eq!(names.len(), 16);
}

#[test]
fn test_press_on_lurking_always_deploys() {
    for pos in [
        ScenePoint::new(-6.0, 300.0),
        ScenePoint::new(400.0, 300.0),
        ScenePoint::new(0.0, 0.0),
    ] {
        let mut scene = SceneLog::new();
        let mut g = lurking_left(&mut scene, Transformation::identity());
        let mut c = ctx(&mut scene, Transformation::identity());
        g.handle_mouse_press(pos, &mut c);
        assert_eq!(g.state(), GuidelineState::DeployedUnlocked(Edge::Left));
    }
}

#[test]
fn test_deploy_takes_graph_value_from_press_position() {
    let t = Transformation::from_scale_offset(2.0, 2.0, 100.0, 50.0);
    let mut scene = SceneLog::new();
    let mut g = lurking_left(&mut scene, t);
    let mut c = ctx(&mut scene, t);
    // Scene x = 140 maps back to graph x = 20
    g.handle_mouse_press(ScenePoint::new(140.0, 300.0), &mut c);
    assert!((g.graph_value() - 20.0).abs() < 1e-9);
}

#[test]
fn test_press_within_tolerance_locks() {
    // Identity transform: the vertical reference axis sits at scene x = 0
    let mut scene = SceneLog::new();
    let mut g = lurking_left(&mut scene, Transformation::identity());
    let mut c = ctx(&mut scene, Transformation::identity());
    g.handle_mouse_press(ScenePoint::new(200.0, 300.0), &mut c);
    assert_eq!(g.state(), GuidelineState::DeployedUnlocked(Edge::Left));

    g.handle_mouse_press(ScenePoint::new(SNAP_TOLERANCE, 300.0), &mut c);
    assert_eq!(g.state(), GuidelineState::DeployedLocked(Edge::Left));
    assert_eq!(g.graph_value(), 0.0);
}

#[test]
fn test_press_outside_tolerance_stays_unlocked() {
    let mut scene = SceneLog::new();
    let mut g = lurking_left(&mut scene, Transformation::identity());
    let mut c = ctx(&mut scene, Transformation::identity());
    g.handle_mouse_press(ScenePoint::new(200.0, 300.0), &mut c);

    g.handle_mouse_press(ScenePoint::new(SNAP_TOLERANCE + 0.1, 300.0), &mut c);
    assert_eq!(g.state(), GuidelineState::DeployedUnlocked(Edge::Left));
}

#[test]
fn test_press_never_locks_without_transformation() {
    let mut scene = SceneLog::new();
    let mut g = lurking_left(&mut scene, Transformation::undefined());
    let mut c = ctx(&mut scene, Transformation::undefined());
    g.handle_mouse_press(ScenePoint::new(200.0, 300.0), &mut c);
    g.handle_mouse_press(ScenePoint::new(0.0, 300.0), &mut c);
    assert_eq!(g.state(), GuidelineState::DeployedUnlocked(Edge::Left));
}

#[test]
fn test_locked_ignores_press() {
    let mut scene = SceneLog::new();
    let mut g = lurking_left(&mut scene, Transformation::identity());
    let mut c = ctx(&mut scene, Transformation::identity());
    g.handle_mouse_press(ScenePoint::new(200.0, 300.0), &mut c);
    g.handle_mouse_press(ScenePoint::new(0.0, 300.0), &mut c);
    assert_eq!(g.state(), GuidelineState::DeployedLocked(Edge::Left));

    g.handle_mouse_press(ScenePoint::new(400.0, 300.0), &mut c);
    assert_eq!(g.state(), GuidelineState::DeployedLocked(Edge::Left));
}

#[test]
fn test_visible_change_gates_painting() {
    let mut scene = SceneLog::new();
    let mut g = lurking_left(&mut scene, Transformation::identity());
    let mut c = ctx(&mut scene, Transformation::identity());
    g.handle_mouse_press(ScenePoint::new(200.0, 300.0), &mut c);
    assert!(g.do_paint());

    g.handle_visible_change(false);
    assert!(!g.do_paint());
    assert_eq!(g.state(), GuidelineState::DeployedUnlocked(Edge::Left));

    g.handle_visible_change(true);
    assert!(g.do_paint());
}

#[test]
fn test_hidden_never_paints() {
    let mut scene = SceneLog::new();
    let mut c = ctx(&mut scene, Transformation::undefined());
    let mut g = Guideline::new(GuidelineId(0), GuidelineState::Hidden(Edge::Top), &mut c);
    assert!(!g.do_paint());
    g.handle_visible_change(true);
    assert!(!g.do_paint());
}

#[test]
fn test_active_change_hides_and_restores_template() {
    let mut scene = SceneLog::new();
    let mut g = lurking_left(&mut scene, Transformation::identity());
    let mut c = ctx(&mut scene, Transformation::identity());

    g.handle_active_change(false, &mut c);
    assert_eq!(g.state(), GuidelineState::Hidden(Edge::Left));

    g.handle_active_change(true, &mut c);
    assert_eq!(g.state(), GuidelineState::Lurking(Edge::Left));
}

#[test]
fn test_hidden_stays_hidden_while_uncalibrated() {
    let mut scene = SceneLog::new();
    let mut c = ctx(&mut scene, Transformation::undefined());
    let mut g = Guideline::new(GuidelineId(0), GuidelineState::Hidden(Edge::Left), &mut c);

    g.handle_active_change(true, &mut c);
    assert_eq!(g.state(), GuidelineState::Hidden(Edge::Left));
}

#[test]
fn test_active_change_is_noop_for_deployed() {
    let mut scene = SceneLog::new();
    let mut g = lurking_left(&mut scene, Transformation::identity());
    let mut c = ctx(&mut scene, Transformation::identity());
    g.handle_mouse_press(ScenePoint::new(200.0, 300.0), &mut c);

    g.handle_active_change(false, &mut c);
    assert_eq!(g.state(), GuidelineState::DeployedUnlocked(Edge::Left));
}

#[test]
fn test_hover_highlight_only_where_enabled() {
    let mut scene = SceneLog::new();
    let mut g = lurking_left(&mut scene, Transformation::identity());
    g.handle_hover_enter();
    assert!(g.is_hovered());
    g.handle_hover_leave();
    assert!(!g.is_hovered());

    // Lock it, then hovering does nothing
    let mut c = ctx(&mut scene, Transformation::identity());
    g.handle_mouse_press(ScenePoint::new(200.0, 300.0), &mut c);
    g.handle_mouse_press(ScenePoint::new(0.0, 300.0), &mut c);
    g.handle_hover_enter();
    assert!(!g.is_hovered());
}

#[test]
fn test_hover_cleared_by_transition() {
    let mut scene = SceneLog::new();
    let mut g = lurking_left(&mut scene, Transformation::identity());
    g.handle_hover_enter();
    assert!(g.is_hovered());

    let mut c = ctx(&mut scene, Transformation::identity());
    g.handle_mouse_press(ScenePoint::new(200.0, 300.0), &mut c);
    assert!(!g.is_hovered());
}

#[test]
fn test_transformation_update_flips_template_states() {
    let mut scene = SceneLog::new();
    let mut g = lurking_left(&mut scene, Transformation::identity());

    let mut undefined = ctx(&mut scene, Transformation::undefined());
    g.update_with_latest_transformation(&mut undefined);
    assert_eq!(g.state(), GuidelineState::Hidden(Edge::Left));

    let mut defined = ctx(&mut scene, Transformation::identity());
    g.update_with_latest_transformation(&mut defined);
    assert_eq!(g.state(), GuidelineState::Lurking(Edge::Left));
}

#[test]
fn test_transformation_update_recomputes_deployed_shape() {
    let t1 = Transformation::from_scale_offset(1.0, 1.0, 0.0, 0.0);
    let mut scene = SceneLog::new();
    let mut g = lurking_left(&mut scene, t1);
    let mut c1 = ctx(&mut scene, t1);
    g.handle_mouse_press(ScenePoint::new(200.0, 300.0), &mut c1);
    let before = g.shape();

    let t2 = Transformation::from_scale_offset(2.0, 1.0, 0.0, 0.0);
    let mut c2 = ctx(&mut scene, t2);
    g.update_with_latest_transformation(&mut c2);
    let after = g.shape();
    assert_ne!(before, after);

    // Same graph value, new scene position
    if let GuidelineShape::Line { a, .. } = after {
        assert!((a.x - 400.0).abs() < 1e-6);
    } else {
        panic!("expected a line shape");
    }
}

#[test]
fn test_polar_horizontal_deployed_is_an_ellipse() {
    let t = Transformation::from_scale_offset(2.0, 3.0, 400.0, 300.0);
    let mut scene = SceneLog::new();
    let mut c = GuidelineContext {
        transformation: t,
        coords_type: CoordsType::Polar,
        color: ColorPalette::Blue,
        scene_rect: test_rect(),
        scene: &mut scene,
    };
    let mut g = Guideline::new(GuidelineId(0), GuidelineState::Lurking(Edge::Top), &mut c);
    g.handle_mouse_press(ScenePoint::new(400.0, 330.0), &mut c);

    match g.shape() {
        GuidelineShape::Ellipse { center, rx, ry } => {
            assert!((center.x - 400.0).abs() < 1e-6);
            assert!((center.y - 300.0).abs() < 1e-6);
            assert!((rx - 20.0).abs() < 1e-6);
            assert!((ry - 30.0).abs() < 1e-6);
        }
        other => panic!("expected ellipse, got {other:?}"),
    }
}

#[test]
fn test_deploy_moves_attachment_to_main_surface() {
    let mut scene = SceneLog::new();
    let mut g = lurking_left(&mut scene, Transformation::identity());
    assert_eq!(g.attachment(), Some(SurfaceKind::EdgeLeft));
    assert_eq!(scene.attachment(g.id()), Some(SurfaceKind::EdgeLeft));

    let mut c = ctx(&mut scene, Transformation::identity());
    g.handle_mouse_press(ScenePoint::new(200.0, 300.0), &mut c);
    assert_eq!(g.attachment(), Some(SurfaceKind::Main));
    assert_eq!(scene.attachment(g.id()), Some(SurfaceKind::Main));
}

#[test]
fn test_remove_from_scene_is_idempotent() {
    let mut scene = SceneLog::new();
    let mut g = lurking_left(&mut scene, Transformation::identity());
    assert_eq!(scene.attached_count(), 1);

    g.remove_from_scene(&mut scene);
    assert_eq!(scene.attached_count(), 0);
    assert_eq!(g.attachment(), None);

    // Second removal is tolerated
    g.remove_from_scene(&mut scene);
    assert_eq!(scene.attached_count(), 0);
}

#[test]
fn test_update_color_tracks_palette() {
    let mut scene = SceneLog::new();
    let mut g = lurking_left(&mut scene, Transformation::identity());
    assert_eq!(g.color(), ColorPalette::Blue);

    let mut c = ctx(&mut scene, Transformation::identity());
    c.color = ColorPalette::Red;
    g.update_color(&c);
    assert_eq!(g.color(), ColorPalette::Red);
}
