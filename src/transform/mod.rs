//! Coordinate Transformation
//! Affine mapping between graph (document) coordinates and scene coordinates

use crate::geometry::{point_line_distance, GraphPoint, Orientation, ScenePoint};


/// Determinants below this threshold are treated as degenerate.
const DEGENERATE_EPSILON: f64 = 1e-9;

/// A 2x3 affine map: `scene = m * graph + t`
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine {
    m: [[f64; 2]; 2],
    t: [f64; 2],
}

impl Affine {
    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.m[0][0] * x + self.m[0][1] * y + self.t[0],
            self.m[1][0] * x + self.m[1][1] * y + self.t[1],
        )
    }

    fn inverse(&self) -> Option<Affine> {
        let det = self.m[0][0] * self.m[1][1] - self.m[0][1] * self.m[1][0];
        if det.abs() < DEGENERATE_EPSILON {
            return None;
        }
        let inv = [
            [self.m[1][1] / det, -self.m[0][1] / det],
            [-self.m[1][0] / det, self.m[0][0] / det],
        ];
        Some(Affine {
            m: inv,
            t: [
                -(inv[0][0] * self.t[0] + inv[0][1] * self.t[1]),
                -(inv[1][0] * self.t[0] + inv[1][1] * self.t[1]),
            ],
        })
    }
}

fn det3(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// The document's graph-to-scene transformation. Undefined until the user
/// has calibrated the axes; every query is None/false until then.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transformation {
    forward: Option<Affine>,
    inverse: Option<Affine>,
}

impl Transformation {
    /// A transformation with no calibration yet
    pub fn undefined() -> Self {
        Self::default()
    }

    /// Identity mapping, mostly useful in tests
    pub fn identity() -> Self {
        Self::from_scale_offset(1.0, 1.0, 0.0, 0.0)
    }

    /// Axis-aligned mapping: `scene = (sx * gx + ox, sy * gy + oy)`
    pub fn from_scale_offset(sx: f64, sy: f64, ox: f64, oy: f64) -> Self {
        let forward = Affine {
            m: [[sx, 0.0], [0.0, sy]],
            t: [ox, oy],
        };
        Self {
            inverse: forward.inverse(),
            forward: Some(forward),
        }
    }

    /// Calibrate from three axis points: solves the affine map sending each
    /// graph point to its picked scene position. Returns None when the
    /// graph points are collinear (no unique affine exists).
    pub fn from_three_points(graph: [GraphPoint; 3], scene: [ScenePoint; 3]) -> Option<Self> {
        let [g0, g1, g2] = graph;
        let [s0, s1, s2] = scene;

        let d = det3([[g0.x, g0.y, 1.0], [g1.x, g1.y, 1.0], [g2.x, g2.y, 1.0]]);
        if d.abs() < DEGENERATE_EPSILON {
            return None;
        }

        // Cramer's rule, one coefficient at a time
        let a = det3([[s0.x, g0.y, 1.0], [s1.x, g1.y, 1.0], [s2.x, g2.y, 1.0]]) / d;
        let b = det3([[g0.x, s0.x, 1.0], [g1.x, s1.x, 1.0], [g2.x, s2.x, 1.0]]) / d;
        let tx = det3([[g0.x, g0.y, s0.x], [g1.x, g1.y, s1.x], [g2.x, g2.y, s2.x]]) / d;
        let c = det3([[s0.y, g0.y, 1.0], [s1.y, g1.y, 1.0], [s2.y, g2.y, 1.0]]) / d;
        let e = det3([[g0.x, s0.y, 1.0], [g1.x, s1.y, 1.0], [g2.x, s2.y, 1.0]]) / d;
        let ty = det3([[g0.x, g0.y, s0.y], [g1.x, g1.y, s1.y], [g2.x, g2.y, s2.y]]) / d;

        let forward = Affine {
            m: [[a, b], [c, e]],
            t: [tx, ty],
        };
        Some(Self {
            inverse: forward.inverse(),
            forward: Some(forward),
        })
    }

    pub fn is_defined(&self) -> bool {
        self.forward.is_some()
    }

    pub fn graph_to_scene(&self, p: GraphPoint) -> Option<ScenePoint> {
        self.forward.map(|a| {
            let (x, y) = a.apply(p.x, p.y);
            ScenePoint::new(x, y)
        })
    }

    pub fn scene_to_graph(&self, p: ScenePoint) -> Option<GraphPoint> {
        self.inverse.map(|a| {
            let (x, y) = a.apply(p.x, p.y);
            GraphPoint::new(x, y)
        })
    }

    /// Scene-space perpendicular distance from `p` to the image of the
    /// reference axis line: graph x = 0 for vertical guidelines, graph
    /// y = 0 for horizontal ones. None while undefined, so the snap test
    /// fails closed.
    pub fn scene_axis_distance(&self, p: ScenePoint, orientation: Orientation) -> Option<f64> {
        let (g0, g1) = match orientation {
            Orientation::Vertical => (GraphPoint::new(0.0, 0.0), GraphPoint::new(0.0, 1.0)),
            Orientation::Horizontal => (GraphPoint::new(0.0, 0.0), GraphPoint::new(1.0, 0.0)),
        };
        let a = self.graph_to_scene(g0)?;
        let b = self.graph_to_scene(g1)?;
        Some(point_line_distance(p, a, b))
    }
}
