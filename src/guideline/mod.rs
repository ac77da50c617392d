//! Guideline State Machine
//! One guideline is a reference aid (line or ellipse) with a finite set of
//! interaction states; every pointer/visibility/transformation event is
//! interpreted by the current state, which is the sole authority over its
//! successors. Invalid events for a state are silent no-ops.

use serde::{Deserialize, Serialize};

use crate::document::{ColorPalette, CoordsType};
use crate::geometry::{
    point_segment_distance, Edge, GraphPoint, Orientation, SceneRect, ScenePoint, EDGE_MARGIN,
};
use crate::scene::{surface_for_state, Scene, SurfaceKind};
use crate::transform::Transformation;

#[cfg(test)]
mod tests;

/// Distance threshold, in scene units, within which a press near the
/// reference axis locks an unlocked deployed guideline. Deliberately a
/// fixed scene-space constant, independent of zoom.
pub const SNAP_TOLERANCE: f64 = 5.0;

/// Stable identity of a guideline within its collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GuidelineId(pub u32);

/// The interaction states. Template states carry the edge the guideline
/// lurks at; deployed states keep it as provenance (it also fixes the
/// orientation, and with it the constant axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "edge", rename_all = "snake_case")]
pub enum GuidelineState {
    /// Waiting at a scene edge, ready to be dragged out
    Lurking(Edge),
    /// Suppressed because no transformation is defined or the tool is inactive
    Hidden(Edge),
    /// Placed in the main scene, freely draggable
    DeployedUnlocked(Edge),
    /// Fixed to the computed axis position
    DeployedLocked(Edge),
}

impl GuidelineState {
    pub fn edge(&self) -> Edge {
        match self {
            GuidelineState::Lurking(e)
            | GuidelineState::Hidden(e)
            | GuidelineState::DeployedUnlocked(e)
            | GuidelineState::DeployedLocked(e) => *e,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.edge().orientation()
    }

    pub fn is_deployed(&self) -> bool {
        matches!(
            self,
            GuidelineState::DeployedUnlocked(_) | GuidelineState::DeployedLocked(_)
        )
    }

    /// Whether this state's visual representation renders at all
    /// (the per-guideline visible flag gates on top of this)
    pub fn paints(&self) -> bool {
        !matches!(self, GuidelineState::Hidden(_))
    }

    /// Locked guidelines are not draggable, so they take no hover highlight
    pub fn accepts_hover(&self) -> bool {
        matches!(
            self,
            GuidelineState::Lurking(_) | GuidelineState::DeployedUnlocked(_)
        )
    }

    /// Stable, unique identifier used for the sorted diagnostic dump
    pub fn state_name(&self) -> &'static str {
        match self {
            GuidelineState::Lurking(Edge::Left) => "template-vertical-left-lurking",
            GuidelineState::Lurking(Edge::Right) => "template-vertical-right-lurking",
            GuidelineState::Lurking(Edge::Top) => "template-horizontal-top-lurking",
            GuidelineState::Lurking(Edge::Bottom) => "template-horizontal-bottom-lurking",
            GuidelineState::Hidden(Edge::Left) => "template-vertical-left-hide",
            GuidelineState::Hidden(Edge::Right) => "template-vertical-right-hide",
            GuidelineState::Hidden(Edge::Top) => "template-horizontal-top-hide",
            GuidelineState::Hidden(Edge::Bottom) => "template-horizontal-bottom-hide",
            GuidelineState::DeployedUnlocked(Edge::Left) => "deployed-constant-x-unlocked-left",
            GuidelineState::DeployedUnlocked(Edge::Right) => "deployed-constant-x-unlocked-right",
            GuidelineState::DeployedUnlocked(Edge::Top) => "deployed-constant-y-unlocked-top",
            GuidelineState::DeployedUnlocked(Edge::Bottom) => "deployed-constant-y-unlocked-bottom",
            GuidelineState::DeployedLocked(Edge::Left) => "deployed-constant-x-locked-left",
            GuidelineState::DeployedLocked(Edge::Right) => "deployed-constant-x-locked-right",
            GuidelineState::DeployedLocked(Edge::Top) => "deployed-constant-y-locked-top",
            GuidelineState::DeployedLocked(Edge::Bottom) => "deployed-constant-y-locked-bottom",
        }
    }
}

/// Current geometric shape of a guideline in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GuidelineShape {
    Line { a: ScenePoint, b: ScenePoint },
    Ellipse { center: ScenePoint, rx: f64, ry: f64 },
}

impl GuidelineShape {
    /// Distance from a scene point to this shape, for hit testing
    pub fn distance_to(&self, p: ScenePoint) -> f64 {
        match self {
            GuidelineShape::Line { a, b } => point_segment_distance(p, *a, *b),
            GuidelineShape::Ellipse { center, rx, ry } => {
                // Normalized-radius approximation, good enough for picking
                let dx = (p.x - center.x) / rx.max(1e-9);
                let dy = (p.y - center.y) / ry.max(1e-9);
                let d = (dx * dx + dy * dy).sqrt();
                (d - 1.0).abs() * rx.min(*ry)
            }
        }
    }
}

/// Per-call view of the external collaborators a guideline reacts to.
/// Guidelines hold no references between events; identity lives in the
/// collection, context is passed in.
pub struct GuidelineContext<'a> {
    pub transformation: Transformation,
    pub coords_type: CoordsType,
    pub color: ColorPalette,
    pub scene_rect: SceneRect,
    pub scene: &'a mut dyn Scene,
}

/// A single guideline: identity, shape, flags and exactly one active state
#[derive(Debug)]
pub struct Guideline {
    id: GuidelineId,
    state: GuidelineState,
    shape: GuidelineShape,
    color: ColorPalette,
    /// Constant graph coordinate once deployed (x for vertical, y for
    /// horizontal); scene coordinate fallback while uncalibrated
    graph_value: f64,
    visible: bool,
    active: bool,
    hovered: bool,
    /// Affordance installed by the state's begin(), released by end()
    hover_enabled: bool,
    attachment: Option<SurfaceKind>,
}

impl Guideline {
    /// Construct in the given initial state, attached to the surface that
    /// state belongs on. Used by the factory only.
    pub(crate) fn new(id: GuidelineId, initial: GuidelineState, ctx: &mut GuidelineContext) -> Self {
        let mut guideline = Self {
            id,
            state: initial,
            shape: GuidelineShape::Line {
                a: ScenePoint::new(0.0, 0.0),
                b: ScenePoint::new(0.0, 0.0),
            },
            color: ctx.color,
            graph_value: 0.0,
            visible: true,
            active: true,
            hovered: false,
            hover_enabled: false,
            attachment: None,
        };
        guideline.begin_state();
        let surface = surface_for_state(&initial);
        ctx.scene.attach(id, surface);
        guideline.attachment = Some(surface);
        guideline.refresh_shape(ctx);
        log::debug!("guideline {} created in {}", id.0, initial.state_name());
        guideline
    }

    pub fn id(&self) -> GuidelineId {
        self.id
    }

    pub fn state(&self) -> GuidelineState {
        self.state
    }

    pub fn shape(&self) -> GuidelineShape {
        self.shape
    }

    pub fn color(&self) -> ColorPalette {
        self.color
    }

    pub fn graph_value(&self) -> f64 {
        self.graph_value
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn attachment(&self) -> Option<SurfaceKind> {
        self.attachment
    }

    /// Whether the visual representation should currently be rendered
    pub fn do_paint(&self) -> bool {
        self.state.paints() && self.visible
    }

    pub fn state_name(&self) -> &'static str {
        self.state.state_name()
    }

    /// One-line dump string for the collection's sorted diagnostic report
    pub fn state_dump(&self) -> String {
        self.state_name().to_string()
    }

    /// The primary transition trigger. Pressing a lurking guideline deploys
    /// it at the press position; pressing an unlocked deployed guideline
    /// within the snap tolerance of its reference axis locks it to the axis.
    pub fn handle_mouse_press(&mut self, pos: ScenePoint, ctx: &mut GuidelineContext) {
        match self.state {
            GuidelineState::Lurking(edge) => {
                self.graph_value = deployed_value_for_press(edge.orientation(), pos, ctx);
                self.transition_to(GuidelineState::DeployedUnlocked(edge), ctx);
            }
            GuidelineState::DeployedUnlocked(edge) => {
                let near_axis = ctx
                    .transformation
                    .scene_axis_distance(pos, edge.orientation())
                    .is_some_and(|d| d <= SNAP_TOLERANCE);
                if near_axis {
                    self.graph_value = 0.0;
                    self.transition_to(GuidelineState::DeployedLocked(edge), ctx);
                }
            }
            GuidelineState::Hidden(_) | GuidelineState::DeployedLocked(_) => {}
        }
    }

    /// Global active-tool change. An inactive tool hides a lurking template;
    /// reactivating restores it once a transformation exists.
    pub fn handle_active_change(&mut self, active: bool, ctx: &mut GuidelineContext) {
        self.active = active;
        match self.state {
            GuidelineState::Lurking(edge) if !active => {
                self.transition_to(GuidelineState::Hidden(edge), ctx);
            }
            GuidelineState::Hidden(edge) if active && ctx.transformation.is_defined() => {
                self.transition_to(GuidelineState::Lurking(edge), ctx);
            }
            _ => {}
        }
    }

    /// Pointer proximity: toggles the highlight, never the state identity
    pub fn handle_hover_enter(&mut self) {
        if self.hover_enabled {
            self.hovered = true;
        }
    }

    pub fn handle_hover_leave(&mut self) {
        self.hovered = false;
    }

    /// Visibility toggle: gates painting, does not transition
    pub fn handle_visible_change(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Refresh the rendered color from the latest palette configuration
    pub fn update_color(&mut self, ctx: &GuidelineContext) {
        self.color = ctx.color;
    }

    /// React to a transformation refresh: template states appear or
    /// disappear with calibration, deployed states recompute their geometry.
    pub fn update_with_latest_transformation(&mut self, ctx: &mut GuidelineContext) {
        match self.state {
            GuidelineState::Lurking(edge) if !ctx.transformation.is_defined() => {
                self.transition_to(GuidelineState::Hidden(edge), ctx);
            }
            GuidelineState::Hidden(edge) if ctx.transformation.is_defined() && self.active => {
                self.transition_to(GuidelineState::Lurking(edge), ctx);
            }
            _ => self.refresh_shape(ctx),
        }
    }

    /// Detach from whichever surface currently holds this guideline.
    /// Tolerated when there is no attachment.
    pub fn remove_from_scene(&mut self, scene: &mut dyn Scene) {
        if self.attachment.take().is_some() {
            scene.detach(self.id);
        }
    }

    /// Destroy the current state and activate `next`: release the old
    /// state's affordances, install the new state's, move surfaces if the
    /// new state belongs elsewhere, and repaint.
    fn transition_to(&mut self, next: GuidelineState, ctx: &mut GuidelineContext) {
        log::debug!(
            "guideline {} transition {} -> {}",
            self.id.0,
            self.state.state_name(),
            next.state_name()
        );
        self.end_state();
        self.state = next;
        self.begin_state();

        let surface = surface_for_state(&self.state);
        if self.attachment != Some(surface) {
            if self.attachment.is_some() {
                ctx.scene.detach(self.id);
            }
            ctx.scene.attach(self.id, surface);
            self.attachment = Some(surface);
        }
        self.refresh_shape(ctx);
    }

    fn begin_state(&mut self) {
        self.hover_enabled = self.state.accepts_hover();
    }

    fn end_state(&mut self) {
        self.hovered = false;
        self.hover_enabled = false;
    }

    fn refresh_shape(&mut self, ctx: &GuidelineContext) {
        self.shape = compute_shape(self.state, self.graph_value, ctx);
    }
}

/// Constant graph coordinate for a guideline deployed at `pos`. Falls back
/// to the raw scene coordinate while no transformation is defined.
fn deployed_value_for_press(
    orientation: Orientation,
    pos: ScenePoint,
    ctx: &GuidelineContext,
) -> f64 {
    match ctx.transformation.scene_to_graph(pos) {
        Some(g) => match orientation {
            Orientation::Vertical => g.x,
            Orientation::Horizontal => g.y,
        },
        None => match orientation {
            Orientation::Vertical => pos.x,
            Orientation::Horizontal => pos.y,
        },
    }
}

fn compute_shape(state: GuidelineState, graph_value: f64, ctx: &GuidelineContext) -> GuidelineShape {
    match state {
        GuidelineState::Lurking(edge) | GuidelineState::Hidden(edge) => {
            template_shape(edge, ctx.scene_rect)
        }
        GuidelineState::DeployedUnlocked(edge) | GuidelineState::DeployedLocked(edge) => {
            deployed_shape(edge.orientation(), graph_value, ctx)
        }
    }
}

/// Template guidelines draw along the midline of their edge strip
fn template_shape(edge: Edge, rect: SceneRect) -> GuidelineShape {
    let half = EDGE_MARGIN / 2.0;
    match edge {
        Edge::Left => GuidelineShape::Line {
            a: ScenePoint::new(rect.left - half, rect.top),
            b: ScenePoint::new(rect.left - half, rect.bottom()),
        },
        Edge::Right => GuidelineShape::Line {
            a: ScenePoint::new(rect.right() + half, rect.top),
            b: ScenePoint::new(rect.right() + half, rect.bottom()),
        },
        Edge::Top => GuidelineShape::Line {
            a: ScenePoint::new(rect.left, rect.top - half),
            b: ScenePoint::new(rect.right(), rect.top - half),
        },
        Edge::Bottom => GuidelineShape::Line {
            a: ScenePoint::new(rect.left, rect.bottom() + half),
            b: ScenePoint::new(rect.right(), rect.bottom() + half),
        },
    }
}

fn deployed_shape(
    orientation: Orientation,
    graph_value: f64,
    ctx: &GuidelineContext,
) -> GuidelineShape {
    let rect = ctx.scene_rect;
    if !ctx.transformation.is_defined() {
        // graph_value is a scene coordinate in this case
        return match orientation {
            Orientation::Vertical => GuidelineShape::Line {
                a: ScenePoint::new(graph_value, rect.top),
                b: ScenePoint::new(graph_value, rect.bottom()),
            },
            Orientation::Horizontal => GuidelineShape::Line {
                a: ScenePoint::new(rect.left, graph_value),
                b: ScenePoint::new(rect.right(), graph_value),
            },
        };
    }

    // Horizontal guidelines on a polar plot are constant-radius curves
    if orientation == Orientation::Horizontal && ctx.coords_type == CoordsType::Polar {
        if let Some(shape) = polar_ellipse(graph_value, ctx) {
            return shape;
        }
    }

    line_through_graph_span(orientation, graph_value, ctx)
}

/// Ellipse for a constant-radius guideline: center at the transformed graph
/// origin, radii measured by transforming the radius along each graph axis.
fn polar_ellipse(radius: f64, ctx: &GuidelineContext) -> Option<GuidelineShape> {
    let center = ctx.transformation.graph_to_scene(GraphPoint::new(0.0, 0.0))?;
    let along_x = ctx
        .transformation
        .graph_to_scene(GraphPoint::new(radius, 0.0))?;
    let along_y = ctx
        .transformation
        .graph_to_scene(GraphPoint::new(0.0, radius))?;
    Some(GuidelineShape::Ellipse {
        center,
        rx: center.distance_to(along_x),
        ry: center.distance_to(along_y),
    })
}

/// Scene line for a constant-coordinate guideline, spanning the graph range
/// visible in the scene rectangle
fn line_through_graph_span(
    orientation: Orientation,
    graph_value: f64,
    ctx: &GuidelineContext,
) -> GuidelineShape {
    let rect = ctx.scene_rect;
    let corners = [
        ScenePoint::new(rect.left, rect.top),
        ScenePoint::new(rect.right(), rect.top),
        ScenePoint::new(rect.left, rect.bottom()),
        ScenePoint::new(rect.right(), rect.bottom()),
    ];

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for corner in corners {
        if let Some(g) = ctx.transformation.scene_to_graph(corner) {
            let v = match orientation {
                Orientation::Vertical => g.y,
                Orientation::Horizontal => g.x,
            };
            min = min.min(v);
            max = max.max(v);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        min = 0.0;
        max = 1.0;
    }

    let (ga, gb) = match orientation {
        Orientation::Vertical => (
            GraphPoint::new(graph_value, min),
            GraphPoint::new(graph_value, max),
        ),
        Orientation::Horizontal => (
            GraphPoint::new(min, graph_value),
            GraphPoint::new(max, graph_value),
        ),
    };

    let a = ctx.transformation.graph_to_scene(ga);
    let b = ctx.transformation.graph_to_scene(gb);
    match (a, b) {
        (Some(a), Some(b)) => GuidelineShape::Line { a, b },
        _ => GuidelineShape::Line {
            a: ScenePoint::new(rect.left, rect.top),
            b: ScenePoint::new(rect.left, rect.top),
        },
    }
}
