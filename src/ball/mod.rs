//! Ball state machine.
//!
//! The ball is carried by a unit, loose on a cell, or off the pitch (before
//! kickoff). A carried ball's position is the carrier's position and is never
//! stored separately.
//!
//! Transitions live in `handling`: pickup, catch, bounce, throw and quick
//! pass.

pub mod handling;

use serde::{Deserialize, Serialize};

use crate::core::UnitId;
use crate::pitch::Position;

pub use handling::{PassAccuracy, PassRange, MAX_THROW_DISTANCE};

/// Where the ball is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ball {
    Carried(UnitId),
    Loose(Position),
    OffPitch,
}

impl Ball {
    #[must_use]
    pub const fn carrier(self) -> Option<UnitId> {
        match self {
            Ball::Carried(unit) => Some(unit),
            _ => None,
        }
    }

    #[must_use]
    pub const fn loose_at(self) -> Option<Position> {
        match self {
            Ball::Loose(pos) => Some(pos),
            _ => None,
        }
    }
}
