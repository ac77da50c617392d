//! Scenario Replay
//! Parses JSON event scripts and replays them against a headless guideline
//! collection, producing the final state dump for golden comparisons

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collection::GuidelineCollection;
use crate::document::{ColorPalette, CoordsType, DocumentModel};
use crate::geometry::{Edge, SceneRect, ScenePoint};
use crate::scene::SceneLog;
use crate::transform::Transformation;


#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("could not read scenario file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Axis-aligned calibration used by scripts: `scene = (sx*gx+ox, sy*gy+oy)`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransformSpec {
    pub sx: f64,
    pub sy: f64,
    pub ox: f64,
    pub oy: f64,
}

impl TransformSpec {
    pub fn to_transformation(self) -> Transformation {
        Transformation::from_scale_offset(self.sx, self.sy, self.ox, self.oy)
    }
}

/// One scripted event, applied in order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioEvent {
    /// Pointer press on the cardinal guideline anchored at `edge`
    Press { edge: Edge, x: f64, y: f64 },
    HoverEnter { edge: Edge },
    HoverLeave { edge: Edge },
    ActiveChange { active: bool },
    VisibleChange { visible: bool },
    ColorChange { color: ColorPalette },
    TransformChange { transform: Option<TransformSpec> },
    Clear,
}

/// A complete replay script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub scene_rect: SceneRect,
    #[serde(default)]
    pub coords_type: CoordsType,
    #[serde(default)]
    pub color: ColorPalette,
    #[serde(default)]
    pub transform: Option<TransformSpec>,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

/// Parse a scenario from JSON source
pub fn parse_scenario(source: &str) -> ScenarioResult<Scenario> {
    Ok(serde_json::from_str(source)?)
}

/// Read and parse a scenario file
pub fn load_scenario(path: &Path) -> ScenarioResult<Scenario> {
    parse_scenario(&std::fs::read_to_string(path)?)
}

/// Replay the scenario against a fresh collection and return the final
/// state dump
pub fn run_scenario(scenario: &Scenario) -> String {
    let mut doc = DocumentModel::new(
        scenario.coords_type,
        scenario.color,
        scenario
            .transform
            .map(TransformSpec::to_transformation)
            .unwrap_or_default(),
    );

    let mut scene = SceneLog::new();
    let mut collection = GuidelineCollection::new();
    collection.initialize(scenario.scene_rect, &doc, &mut scene);

    for event in &scenario.events {
        match event {
            ScenarioEvent::Press { edge, x, y } => {
                if let Some(id) = collection.find_by_edge(*edge) {
                    collection.handle_mouse_press(id, ScenePoint::new(*x, *y), &mut scene);
                }
            }
            ScenarioEvent::HoverEnter { edge } => {
                if let Some(id) = collection.find_by_edge(*edge) {
                    collection.handle_hover_enter(id);
                }
            }
            ScenarioEvent::HoverLeave { edge } => {
                if let Some(id) = collection.find_by_edge(*edge) {
                    collection.handle_hover_leave(id);
                }
            }
            ScenarioEvent::ActiveChange { active } => {
                collection.handle_active_change(*active, &mut scene);
            }
            ScenarioEvent::VisibleChange { visible } => {
                collection.handle_visible_change(*visible);
            }
            ScenarioEvent::ColorChange { color } => {
                doc.guideline_color = *color;
                collection.update_color(&doc, &mut scene);
            }
            ScenarioEvent::TransformChange { transform } => {
                doc.transformation = transform
                    .map(TransformSpec::to_transformation)
                    .unwrap_or_default();
                collection.update_with_latest_transformation(&doc, &mut scene);
            }
            ScenarioEvent::Clear => {
                collection.clear(&mut scene);
            }
        }
    }

    collection.state_dump()
}
