//! Graphtrace - Interactive Graph Digitizer
//! Guideline state machines for calibrating plot images with snapping
//! reference aids

pub mod collection;
pub mod document;
pub mod geometry;
pub mod guideline;
pub mod scenario;
pub mod scene;
pub mod transform;

pub use collection::{GuidelineCollection, GuidelineFactory};
pub use guideline::{Guideline, GuidelineId, GuidelineState};
pub use scenario::{parse_scenario, run_scenario};
pub use transform::Transformation;
