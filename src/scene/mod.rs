//! Scene Attachment
//! Abstract contract between guidelines and whatever renders them: a main
//! surface plus one surface per cardinal edge

use serde::{Deserialize, Serialize};

use crate::geometry::Edge;
use crate::guideline::{GuidelineId, GuidelineState};

#[cfg(test)]
mod tests;

/// The rendering surfaces a guideline can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    Main,
    EdgeLeft,
    EdgeRight,
    EdgeTop,
    EdgeBottom,
}

impl SurfaceKind {
    pub fn for_edge(edge: Edge) -> SurfaceKind {
        match edge {
            Edge::Left => SurfaceKind::EdgeLeft,
            Edge::Right => SurfaceKind::EdgeRight,
            Edge::Top => SurfaceKind::EdgeTop,
            Edge::Bottom => SurfaceKind::EdgeBottom,
        }
    }
}

/// Which surface a guideline in the given state belongs on: template states
/// live in their edge strip, deployed states in the main scene.
pub fn surface_for_state(state: &GuidelineState) -> SurfaceKind {
    match state {
        GuidelineState::Lurking(edge) | GuidelineState::Hidden(edge) => {
            SurfaceKind::for_edge(*edge)
        }
        GuidelineState::DeployedUnlocked(_) | GuidelineState::DeployedLocked(_) => {
            SurfaceKind::Main
        }
    }
}

/// What the guideline core asks of a rendering surface. Implementations
/// must tolerate detach calls for ids they do not hold.
pub trait Scene {
    fn attach(&mut self, id: GuidelineId, surface: SurfaceKind);
    fn detach(&mut self, id: GuidelineId);
}

/// Scene that ignores everything; handy when no rendering exists
#[derive(Debug, Default)]
pub struct NullScene;

impl Scene for NullScene {
    fn attach(&mut self, _id: GuidelineId, _surface: SurfaceKind) {}
    fn detach(&mut self, _id: GuidelineId) {}
}

/// A recorded attach or detach call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    Attached(GuidelineId, SurfaceKind),
    Detached(GuidelineId),
}

/// Scene that records every call, for tests and headless scenario replay
#[derive(Debug, Default)]
pub struct SceneLog {
    attached: std::collections::HashMap<GuidelineId, SurfaceKind>,
    events: Vec<SceneEvent>,
}

impl SceneLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attachment(&self, id: GuidelineId) -> Option<SurfaceKind> {
        self.attached.get(&id).copied()
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }
}

impl Scene for SceneLog {
    fn attach(&mut self, id: GuidelineId, surface: SurfaceKind) {
        self.attached.insert(id, surface);
        self.events.push(SceneEvent::Attached(id, surface));
    }

    fn detach(&mut self, id: GuidelineId) {
        self.attached.remove(&id);
        self.events.push(SceneEvent::Detached(id));
    }
}
