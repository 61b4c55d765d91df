//! Identifiers for teams and units, plus per-team storage.
//!
//! ## TeamId
//!
//! A match always has exactly two sides. `TeamId::HOME` places first,
//! receives the opening kickoff and attacks the high-x end zone.
//!
//! ## TeamMap
//!
//! Fixed two-slot storage indexed by `TeamId`, used for scores, turn
//! counters and the teams themselves.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two sides in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(u8);

impl TeamId {
    /// The side that sets up on the low-x half.
    pub const HOME: TeamId = TeamId(0);
    /// The side that sets up on the high-x half.
    pub const AWAY: TeamId = TeamId(1);

    /// Get the raw team index (0 or 1).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> TeamId {
        TeamId(1 - self.0)
    }

    /// Both teams, home first.
    pub fn both() -> impl Iterator<Item = TeamId> {
        [TeamId::HOME, TeamId::AWAY].into_iter()
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            TeamId::HOME => write!(f, "home"),
            _ => write!(f, "away"),
        }
    }
}

/// Unique identifier for a unit within a match.
///
/// Allocated sequentially by the match as units are purchased, so lower ids
/// were bought earlier. Ordering is used for deterministic tie-breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Per-team data storage with O(1) access.
///
/// ```
/// use gridball::core::{TeamId, TeamMap};
///
/// let mut score: TeamMap<u8> = TeamMap::with_value(0);
/// score[TeamId::AWAY] += 1;
/// assert_eq!(score[TeamId::HOME], 0);
/// assert_eq!(score[TeamId::AWAY], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamMap<T> {
    data: [T; 2],
}

impl<T> TeamMap<T> {
    /// Create a new TeamMap with values from a factory function.
    pub fn new(factory: impl Fn(TeamId) -> T) -> Self {
        Self {
            data: [factory(TeamId::HOME), factory(TeamId::AWAY)],
        }
    }

    /// Create a new TeamMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Iterate over (TeamId, &T) pairs, home first.
    pub fn iter(&self) -> impl Iterator<Item = (TeamId, &T)> {
        TeamId::both().zip(self.data.iter())
    }

    /// Iterate over (TeamId, &mut T) pairs, home first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (TeamId, &mut T)> {
        TeamId::both().zip(self.data.iter_mut())
    }
}

impl<T: Default> Default for TeamMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<TeamId> for TeamMap<T> {
    type Output = T;

    fn index(&self, team: TeamId) -> &Self::Output {
        &self.data[team.index()]
    }
}

impl<T> IndexMut<TeamId> for TeamMap<T> {
    fn index_mut(&mut self, team: TeamId) -> &mut Self::Output {
        &mut self.data[team.index()]
    }
}
