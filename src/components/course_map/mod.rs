//! Course prerequisite map: a keyed canvas scene over a department dataset,
//! with program selection, hover highlighting and department swaps.

mod component;
pub mod graph;
pub mod legend;
pub mod loader;
pub mod palette;
mod render;
pub mod scale;
pub mod scene;
pub mod settings;
pub mod state;
pub mod tween;
pub mod types;
pub mod viewport;

pub use component::CourseMapCanvas;
pub use settings::{Department, DisplaySettings, LayoutKind};
pub use state::{CourseInfo, CourseMapState, InfoPanel, SceneStatus};
pub use types::{Course, Dataset, Equivalency, Program, Requisite, RequisiteKind};
