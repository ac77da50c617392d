//! Scene Geometry
//! Points, rectangles and the edge regions that host template guidelines

use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

/// Width of the edge strips flanking the main scene, in scene units.
pub const EDGE_MARGIN: f64 = 13.0;

/// A point in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenePoint {
    pub x: f64,
    pub y: f64,
}

impl ScenePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: ScenePoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A point in graph (document) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint {
    pub x: f64,
    pub y: f64,
}

impl GraphPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SceneRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, p: ScenePoint) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }
}

/// Which side of the scene a template guideline is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// Left/right edges host vertical (constant-X) guidelines,
    /// top/bottom edges host horizontal (constant-Y) guidelines.
    pub fn orientation(&self) -> Orientation {
        match self {
            Edge::Left | Edge::Right => Orientation::Vertical,
            Edge::Top | Edge::Bottom => Orientation::Horizontal,
        }
    }
}

/// Orientation of a guideline: vertical holds X constant, horizontal holds Y constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// The four strips flanking the main scene where template guidelines lurk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRegions {
    pub left: SceneRect,
    pub right: SceneRect,
    pub top: SceneRect,
    pub bottom: SceneRect,
}

impl EdgeRegions {
    pub fn for_edge(&self, edge: Edge) -> SceneRect {
        match edge {
            Edge::Left => self.left,
            Edge::Right => self.right,
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
        }
    }
}

/// Compute the four edge regions: a strip of `margin` scene units just
/// outside each side of the main scene rectangle.
pub fn edge_regions(scene: SceneRect, margin: f64) -> EdgeRegions {
    EdgeRegions {
        left: SceneRect::new(scene.left - margin, scene.top, margin, scene.height),
        right: SceneRect::new(scene.right(), scene.top, margin, scene.height),
        top: SceneRect::new(scene.left, scene.top - margin, scene.width, margin),
        bottom: SceneRect::new(scene.left, scene.bottom(), scene.width, margin),
    }
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
/// Degenerates to point distance when `a` and `b` coincide.
pub fn point_line_distance(p: ScenePoint, a: ScenePoint, b: ScenePoint) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return p.distance_to(a);
    }
    ((p.x - a.x) * dy - (p.y - a.y) * dx).abs() / len
}

/// Distance from `p` to the segment between `a` and `b`, used for hit testing.
pub fn point_segment_distance(p: ScenePoint, a: ScenePoint, b: ScenePoint) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(ScenePoint::new(a.x + t * dx, a.y + t * dy))
}
