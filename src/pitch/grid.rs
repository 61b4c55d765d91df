//! The pitch: bounds, occupancy index and end zones.
//!
//! `Pitch` knows which unit stands on which cell and nothing else. Questions
//! that need a unit's team or state (tackle zones) take the unit table as an
//! argument, keeping the occupancy index the only thing stored here.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::position::{Position, DIRECTIONS};
use crate::core::{TeamId, UnitId};
use crate::units::{Unit, Units};

/// Fixed-size grid with at most one unit per cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitch {
    width: i32,
    height: i32,
    end_zone_depth: i32,
    #[serde(with = "occupancy_entries")]
    occupancy: FxHashMap<Position, UnitId>,
}

/// Occupancy goes over the wire as `(cell, unit)` pairs, sorted by cell, so
/// formats that only allow string map keys can carry a `Pitch`.
mod occupancy_entries {
    use rustc_hash::FxHashMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Position;
    use crate::core::UnitId;

    pub fn serialize<S: Serializer>(
        occupancy: &FxHashMap<Position, UnitId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<(Position, UnitId)> = occupancy.iter().map(|(p, u)| (*p, *u)).collect();
        entries.sort();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<FxHashMap<Position, UnitId>, D::Error> {
        let entries = Vec::<(Position, UnitId)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

impl Pitch {
    /// Create an empty pitch.
    #[must_use]
    pub fn new(width: i32, height: i32, end_zone_depth: i32) -> Self {
        Self {
            width,
            height,
            end_zone_depth,
            occupancy: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The kickoff spot.
    #[must_use]
    pub fn centre(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    #[must_use]
    pub fn in_bounds(&self, pos: Position) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    /// In-bounds neighbours, in scatter order.
    #[must_use]
    pub fn neighbors(&self, pos: Position) -> SmallVec<[Position; 8]> {
        DIRECTIONS
            .iter()
            .map(|&(dx, dy)| pos.offset(dx, dy))
            .filter(|p| self.in_bounds(*p))
            .collect()
    }

    #[must_use]
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.occupancy.contains_key(&pos)
    }

    #[must_use]
    pub fn unit_at(&self, pos: Position) -> Option<UnitId> {
        self.occupancy.get(&pos).copied()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.occupancy.len()
    }

    /// Put a unit on an empty cell. Returns false if the cell is taken.
    pub(crate) fn occupy(&mut self, pos: Position, unit: UnitId) -> bool {
        if self.occupancy.contains_key(&pos) {
            return false;
        }
        self.occupancy.insert(pos, unit);
        true
    }

    /// Clear a cell, returning whoever stood there.
    pub(crate) fn vacate(&mut self, pos: Position) -> Option<UnitId> {
        self.occupancy.remove(&pos)
    }

    pub(crate) fn clear(&mut self) {
        self.occupancy.clear();
    }

    /// Whether `pos` is in the end zone `team` scores in.
    ///
    /// Home attacks the high-x edge, away the low-x edge.
    #[must_use]
    pub fn is_scoring_zone(&self, pos: Position, team: TeamId) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        match team {
            TeamId::HOME => pos.x >= self.width - self.end_zone_depth,
            _ => pos.x < self.end_zone_depth,
        }
    }

    /// Count adjacent Standing units belonging to `opposing_team`.
    #[must_use]
    pub fn tackle_zone_count(&self, pos: Position, opposing_team: TeamId, units: &Units) -> u8 {
        self.neighbors(pos)
            .into_iter()
            .filter_map(|p| self.unit_at(p))
            .filter_map(|id| units.get(&id))
            .filter(|u| u.team == opposing_team && u.state.exerts_tackle_zone())
            .count() as u8
    }

    /// Adjacent units matching `pred`, lowest id first.
    pub fn adjacent_units(
        &self,
        pos: Position,
        units: &Units,
        pred: impl Fn(&Unit) -> bool,
    ) -> Vec<UnitId> {
        let mut found: Vec<UnitId> = self
            .neighbors(pos)
            .into_iter()
            .filter_map(|p| self.unit_at(p))
            .filter(|id| units.get(id).is_some_and(|u| pred(u)))
            .collect();
        found.sort();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{RosterKind, UnitState};

    fn pitch() -> Pitch {
        Pitch::new(26, 15, 3)
    }

    fn lineman(id: u32, team: TeamId, pos: Position) -> Unit {
        let role = &RosterKind::Watch.roles()[0];
        let mut unit = Unit::from_role(UnitId(id), team, role);
        unit.position = Some(pos);
        unit
    }

    #[test]
    fn test_bounds() {
        let pitch = pitch();
        assert!(pitch.in_bounds(Position::new(0, 0)));
        assert!(pitch.in_bounds(Position::new(25, 14)));
        assert!(!pitch.in_bounds(Position::new(26, 0)));
        assert!(!pitch.in_bounds(Position::new(0, -1)));
    }

    #[test]
    fn test_corner_has_three_neighbors() {
        let pitch = pitch();
        assert_eq!(pitch.neighbors(Position::new(0, 0)).len(), 3);
        assert_eq!(pitch.neighbors(Position::new(5, 5)).len(), 8);
        assert_eq!(pitch.neighbors(Position::new(25, 7)).len(), 5);
    }

    #[test]
    fn test_one_unit_per_cell() {
        let mut pitch = pitch();
        let cell = Position::new(4, 4);
        assert!(pitch.occupy(cell, UnitId(1)));
        assert!(!pitch.occupy(cell, UnitId(2)));
        assert_eq!(pitch.unit_at(cell), Some(UnitId(1)));

        assert_eq!(pitch.vacate(cell), Some(UnitId(1)));
        assert!(!pitch.is_occupied(cell));
    }

    #[test]
    fn test_scoring_zones() {
        let pitch = pitch();
        assert!(pitch.is_scoring_zone(Position::new(25, 3), TeamId::HOME));
        assert!(pitch.is_scoring_zone(Position::new(23, 3), TeamId::HOME));
        assert!(!pitch.is_scoring_zone(Position::new(22, 3), TeamId::HOME));
        assert!(pitch.is_scoring_zone(Position::new(0, 3), TeamId::AWAY));
        assert!(pitch.is_scoring_zone(Position::new(2, 3), TeamId::AWAY));
        assert!(!pitch.is_scoring_zone(Position::new(3, 3), TeamId::AWAY));
        assert!(!pitch.is_scoring_zone(Position::new(25, 3), TeamId::AWAY));
    }

    #[test]
    fn test_occupancy_survives_json() {
        let mut pitch = pitch();
        pitch.occupy(Position::new(4, 4), UnitId(1));
        pitch.occupy(Position::new(9, 2), UnitId(7));

        let json = serde_json::to_string(&pitch).unwrap();
        let back: Pitch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pitch);
        assert_eq!(back.unit_at(Position::new(9, 2)), Some(UnitId(7)));
    }

    #[test]
    fn test_tackle_zones_only_from_standing_opponents() {
        let mut pitch = pitch();
        let mut units = Units::new();

        let target = Position::new(10, 7);
        for (id, team, pos) in [
            (1, TeamId::AWAY, Position::new(11, 7)),
            (2, TeamId::AWAY, Position::new(9, 6)),
            (3, TeamId::HOME, Position::new(10, 8)),
            (4, TeamId::AWAY, Position::new(12, 7)),
        ] {
            pitch.occupy(pos, UnitId(id));
            units.insert(UnitId(id), lineman(id, team, pos));
        }

        assert_eq!(pitch.tackle_zone_count(target, TeamId::AWAY, &units), 2);

        units.get_mut(&UnitId(2)).unwrap().state = UnitState::Prone;
        assert_eq!(pitch.tackle_zone_count(target, TeamId::AWAY, &units), 1);
    }
}
