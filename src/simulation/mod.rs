mod automaton;
mod exclusion;
mod grid;

pub use automaton::{
    ease_toward, grid_extent, Brush, StepStats, ToroidalAutomatonField, TransitionOdds,
};
pub use exclusion::{FuzzyExclusionZone, Rect};
pub use grid::LifeGrid;
