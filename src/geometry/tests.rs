//! Unit tests for scene geometry

use crate::geometry::{
    edge_regions, point_line_distance, point_segment_distance, Edge, Orientation, ScenePoint,
    SceneRect,
};

#[test]
fn test_scene_rect_extents() {
    let rect = SceneRect::new(10.0, 20.0, 100.0, 50.0);
    assert_eq!(rect.right(), 110.0);
    assert_eq!(rect.bottom(), 70.0);
    assert!(rect.contains(ScenePoint::new(10.0, 20.0)));
    assert!(rect.contains(ScenePoint::new(110.0, 70.0)));
    assert!(!rect.contains(ScenePoint::new(111.0, 30.0)));
}

#[test]
fn test_edge_orientation() {
    assert_eq!(Edge::Left.orientation(), Orientation::Vertical);
    assert_eq!(Edge::Right.orientation(), Orientation::Vertical);
    assert_eq!(Edge::Top.orientation(), Orientation::Horizontal);
    assert_eq!(Edge::Bottom.orientation(), Orientation::Horizontal);
}

#[test]
fn test_edge_regions_flank_the_scene() {
    let scene = SceneRect::new(0.0, 0.0, 800.0, 600.0);
    let regions = edge_regions(scene, 13.0);

    assert_eq!(regions.left, SceneRect::new(-13.0, 0.0, 13.0, 600.0));
    assert_eq!(regions.right, SceneRect::new(800.0, 0.0, 13.0, 600.0));
    assert_eq!(regions.top, SceneRect::new(0.0, -13.0, 800.0, 13.0));
    assert_eq!(regions.bottom, SceneRect::new(0.0, 600.0, 800.0, 13.0));

    // Strips do not overlap the scene itself
    assert!(!scene.contains(ScenePoint::new(-1.0, 300.0)));
    assert!(regions.left.contains(ScenePoint::new(-1.0, 300.0)));
}

#[test]
fn test_edge_regions_lookup_by_edge() {
    let scene = SceneRect::new(0.0, 0.0, 100.0, 100.0);
    let regions = edge_regions(scene, 10.0);
    for edge in Edge::ALL {
        let strip = regions.for_edge(edge);
        assert_eq!(strip.width * strip.height, 10.0 * 100.0);
    }
}

#[test]
fn test_point_line_distance() {
    let a = ScenePoint::new(0.0, 0.0);
    let b = ScenePoint::new(0.0, 10.0);
    assert!((point_line_distance(ScenePoint::new(3.0, 5.0), a, b) - 3.0).abs() < 1e-9);
    // Beyond the segment endpoints the infinite line still counts
    assert!((point_line_distance(ScenePoint::new(3.0, 50.0), a, b) - 3.0).abs() < 1e-9);
    // Degenerate line falls back to point distance
    assert!((point_line_distance(ScenePoint::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-9);
}

#[test]
fn test_point_segment_distance_clamps_to_endpoints() {
    let a = ScenePoint::new(0.0, 0.0);
    let b = ScenePoint::new(10.0, 0.0);
    assert!((point_segment_distance(ScenePoint::new(5.0, 2.0), a, b) - 2.0).abs() < 1e-9);
    assert!((point_segment_distance(ScenePoint::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-9);
}
