//! Guideline Collection
//! Owns the guideline instances, creates them through the factory,
//! broadcasts global events to every member and renders the deterministic
//! sorted state dump used for diagnostics

use crate::document::{ColorPalette, CoordsType, DocumentModel};
use crate::geometry::{edge_regions, Edge, EdgeRegions, SceneRect, ScenePoint, EDGE_MARGIN};
use crate::guideline::{Guideline, GuidelineContext, GuidelineId, GuidelineState};
use crate::scene::Scene;
use crate::transform::Transformation;


/// Fixed header line of the diagnostic dump; the tested contract
pub const STATE_DUMP_HEADER: &str = "GuidelineCollection::stateDump:";

const STATE_DUMP_INDENT: &str = "                    ";

/// Creates fully-constructed guidelines with monotonically increasing ids,
/// attached to the surface their initial state belongs on
#[derive(Debug, Default)]
pub struct GuidelineFactory {
    next_id: u32,
}

impl GuidelineFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_guideline(
        &mut self,
        initial: GuidelineState,
        ctx: &mut GuidelineContext,
    ) -> Guideline {
        let id = GuidelineId(self.next_id);
        self.next_id += 1;
        Guideline::new(id, initial, ctx)
    }
}

/// Ordered set of guidelines plus the latest snapshot of the document
/// state they react to. Membership order is creation order; it carries no
/// behavioral meaning (the dump re-sorts).
#[derive(Debug, Default)]
pub struct GuidelineCollection {
    factory: Option<GuidelineFactory>,
    members: Vec<Guideline>,
    scene_rect: SceneRect,
    edge_regions: Option<EdgeRegions>,
    coords_type: CoordsType,
    color: ColorPalette,
    transformation: Transformation,
}

impl GuidelineCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct the factory, compute the edge regions and create the four
    /// cardinal guidelines: lurking when a transformation is defined,
    /// hidden otherwise. Re-initializing clears any previous membership.
    pub fn initialize(&mut self, scene_rect: SceneRect, doc: &DocumentModel, scene: &mut dyn Scene) {
        self.clear(scene);

        self.scene_rect = scene_rect;
        self.edge_regions = Some(edge_regions(scene_rect, EDGE_MARGIN));
        self.coords_type = doc.coords_type;
        self.color = doc.guideline_color;
        self.transformation = doc.transformation;
        self.factory = Some(GuidelineFactory::new());

        let defined = self.transformation.is_defined();
        for edge in Edge::ALL {
            let initial = if defined {
                GuidelineState::Lurking(edge)
            } else {
                GuidelineState::Hidden(edge)
            };
            let guideline = self.create_guideline(initial, scene);
            self.register_guideline(guideline);
        }

        log::info!(
            "guideline collection initialized with {} members (transformation defined: {})",
            self.members.len(),
            defined
        );
    }

    /// Factory delegate. The returned guideline is NOT registered; callers
    /// decide, which supports transient preview guidelines.
    pub fn create_guideline(
        &mut self,
        initial: GuidelineState,
        scene: &mut dyn Scene,
    ) -> Guideline {
        let mut ctx = self.make_context(scene);
        self.factory
            .as_mut()
            .expect("GuidelineCollection used before initialize()")
            .create_guideline(initial, &mut ctx)
    }

    /// Append to the membership. Callers must not register the same
    /// guideline twice.
    pub fn register_guideline(&mut self, guideline: Guideline) {
        self.members.push(guideline);
    }

    /// Detach every guideline from its surface and empty the membership.
    /// Safe on an already-empty collection.
    pub fn clear(&mut self, scene: &mut dyn Scene) {
        if self.members.is_empty() {
            return;
        }
        for guideline in &mut self.members {
            guideline.remove_from_scene(scene);
        }
        log::info!("guideline collection cleared {} members", self.members.len());
        self.members.clear();
    }

    /// Broadcast a global active-tool change to every member
    pub fn handle_active_change(&mut self, active: bool, scene: &mut dyn Scene) {
        let mut ctx = self.make_context(scene);
        for guideline in &mut self.members {
            guideline.handle_active_change(active, &mut ctx);
        }
    }

    /// Broadcast a visibility toggle to every member
    pub fn handle_visible_change(&mut self, visible: bool) {
        for guideline in &mut self.members {
            guideline.handle_visible_change(visible);
        }
    }

    /// Dispatch a pointer press to one member. Unknown ids are ignored.
    pub fn handle_mouse_press(&mut self, id: GuidelineId, pos: ScenePoint, scene: &mut dyn Scene) {
        let mut ctx = self.make_context(scene);
        if let Some(guideline) = self.members.iter_mut().find(|g| g.id() == id) {
            guideline.handle_mouse_press(pos, &mut ctx);
        }
    }

    pub fn handle_hover_enter(&mut self, id: GuidelineId) {
        if let Some(guideline) = self.members.iter_mut().find(|g| g.id() == id) {
            guideline.handle_hover_enter();
        }
    }

    pub fn handle_hover_leave(&mut self, id: GuidelineId) {
        if let Some(guideline) = self.members.iter_mut().find(|g| g.id() == id) {
            guideline.handle_hover_leave();
        }
    }

    /// Refresh every member's color from the latest palette configuration
    pub fn update_color(&mut self, doc: &DocumentModel, scene: &mut dyn Scene) {
        self.color = doc.guideline_color;
        let ctx = self.make_context(scene);
        for guideline in &mut self.members {
            guideline.update_color(&ctx);
        }
    }

    /// Refresh every member against the latest transformation so templates
    /// appear/disappear and deployed geometry is recomputed
    pub fn update_with_latest_transformation(
        &mut self,
        doc: &DocumentModel,
        scene: &mut dyn Scene,
    ) {
        self.coords_type = doc.coords_type;
        self.transformation = doc.transformation;
        let mut ctx = self.make_context(scene);
        for guideline in &mut self.members {
            guideline.update_with_latest_transformation(&mut ctx);
        }
    }

    /// Fixed-format diagnostic report: header line, then one indented line
    /// per guideline, entries sorted lexicographically so the output is
    /// independent of registration order.
    pub fn state_dump(&self) -> String {
        let mut sorted: Vec<String> = self.members.iter().map(Guideline::state_dump).collect();
        sorted.sort();

        let mut out = String::from(STATE_DUMP_HEADER);
        out.push('\n');
        for entry in &sorted {
            out.push_str(STATE_DUMP_INDENT);
            out.push_str(entry);
            out.push('\n');
        }
        out
    }

    /// Nearest paintable guideline within `tolerance` of `pos`, if any
    pub fn hit_test(&self, pos: ScenePoint, tolerance: f64) -> Option<GuidelineId> {
        self.members
            .iter()
            .filter(|g| g.do_paint())
            .map(|g| (g.id(), g.shape().distance_to(pos)))
            .filter(|(_, d)| *d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// The cardinal guideline anchored at (or deployed from) `edge`
    pub fn find_by_edge(&self, edge: Edge) -> Option<GuidelineId> {
        self.members
            .iter()
            .find(|g| g.state().edge() == edge)
            .map(Guideline::id)
    }

    pub fn guideline(&self, id: GuidelineId) -> Option<&Guideline> {
        self.members.iter().find(|g| g.id() == id)
    }

    pub fn guidelines(&self) -> &[Guideline] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Read-only pass-through queries of the latest document snapshot
    pub fn color(&self) -> ColorPalette {
        self.color
    }

    pub fn coords_type(&self) -> CoordsType {
        self.coords_type
    }

    pub fn transformation(&self) -> Transformation {
        self.transformation
    }

    pub fn edge_regions(&self) -> EdgeRegions {
        self.edge_regions
            .expect("GuidelineCollection used before initialize()")
    }

    fn make_context<'a>(&self, scene: &'a mut dyn Scene) -> GuidelineContext<'a> {
        GuidelineContext {
            transformation: self.transformation,
            coords_type: self.coords_type,
            color: self.color,
            scene_rect: self.scene_rect,
            scene,
        }
    }
}
