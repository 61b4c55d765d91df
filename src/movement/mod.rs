//! Movement & pathfinder.
//!
//! - `pathfinder`: which cells a unit can reach and the safest way there
//! - `mover`: walking a path and standing up

pub mod mover;
pub mod pathfinder;

pub use mover::{stand_up, walk};
pub use pathfinder::{
    legal_moves, path_success, step_tests, suggest_path, PathPlanner, StepTests, SuggestedPath,
    RUSH_TARGET,
};
