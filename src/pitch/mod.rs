//! Spatial model: coordinates, adjacency, occupancy and tackle zones.
//!
//! Pure geometry. Nothing here rolls dice or changes unit state.

mod grid;
mod position;

pub use grid::Pitch;
pub use position::{Position, DIRECTIONS};
