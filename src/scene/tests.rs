//! Unit tests for the scene attachment contract

use crate::geometry::Edge;
use crate::guideline::{GuidelineId, GuidelineState};
use crate::scene::{surface_for_state, Scene, SceneEvent, SceneLog, SurfaceKind};

#[test]
fn test_surface_for_template_states_is_the_edge_strip() {
    assert_eq!(
        surface_for_state(&GuidelineState::Lurking(Edge::Left)),
        SurfaceKind::EdgeLeft
    );
    assert_eq!(
        surface_for_state(&GuidelineState::Hidden(Edge::Right)),
        SurfaceKind::EdgeRight
    );
    assert_eq!(
        surface_for_state(&GuidelineState::Lurking(Edge::Top)),
        SurfaceKind::EdgeTop
    );
    assert_eq!(
        surface_for_state(&GuidelineState::Hidden(Edge::Bottom)),
        SurfaceKind::EdgeBottom
    );
}

#[test]
fn test_surface_for_deployed_states_is_main() {
    for edge in Edge::ALL {
        assert_eq!(
            surface_for_state(&GuidelineState::DeployedUnlocked(edge)),
            SurfaceKind::Main
        );
        assert_eq!(
            surface_for_state(&GuidelineState::DeployedLocked(edge)),
            SurfaceKind::Main
        );
    }
}

#[test]
fn test_scene_log_records_attachments() {
    let mut log = SceneLog::new();
    let id = GuidelineId(7);

    log.attach(id, SurfaceKind::EdgeLeft);
    assert_eq!(log.attachment(id), Some(SurfaceKind::EdgeLeft));
    assert_eq!(log.attached_count(), 1);

    log.attach(id, SurfaceKind::Main);
    assert_eq!(log.attachment(id), Some(SurfaceKind::Main));
    assert_eq!(log.attached_count(), 1);

    log.detach(id);
    assert_eq!(log.attachment(id), None);
    assert_eq!(log.attached_count(), 0);

    assert_eq!(
        log.events(),
        &[
            SceneEvent::Attached(id, SurfaceKind::EdgeLeft),
            SceneEvent::Attached(id, SurfaceKind::Main),
            SceneEvent::Detached(id),
        ]
    );
}

#[test]
fn test_scene_log_tolerates_unknown_detach() {
    let mut log = SceneLog::new();
    log.detach(GuidelineId(42));
    assert_eq!(log.attached_count(), 0);
}
