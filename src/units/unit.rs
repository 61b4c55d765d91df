//! A single unit: stats, skills, state and position.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::roster::RoleSpec;
use super::skills::Skill;
use crate::core::{TeamId, UnitId};
use crate::pitch::Position;

/// Condition of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitState {
    Standing,
    Prone,
    Stunned,
    KnockedOut,
    Casualty,
    Ejected,
}

impl UnitState {
    /// Only Standing units project a tackle zone, catch or act.
    #[must_use]
    pub const fn exerts_tackle_zone(self) -> bool {
        matches!(self, UnitState::Standing)
    }

    /// Off the pitch for good (or until the next reset).
    #[must_use]
    pub const fn is_removed(self) -> bool {
        matches!(
            self,
            UnitState::KnockedOut | UnitState::Casualty | UnitState::Ejected
        )
    }

    /// Lying on the pitch.
    #[must_use]
    pub const fn is_down(self) -> bool {
        matches!(self, UnitState::Prone | UnitState::Stunned)
    }
}

/// Printed characteristics.
///
/// `agility`, `passing` and `armor` are targets: lower agility and passing
/// are better, higher armor is better.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    pub movement: u8,
    pub strength: u8,
    pub agility: u8,
    pub passing: u8,
    pub armor: u8,
}

impl Stats {
    #[must_use]
    pub const fn new(movement: u8, strength: u8, agility: u8, passing: u8, armor: u8) -> Self {
        Self { movement, strength, agility, passing, armor }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub team: TeamId,
    /// Role name from the team's roster.
    pub role: String,
    pub stats: Stats,
    pub skills: SmallVec<[Skill; 4]>,
    pub state: UnitState,
    pub position: Option<Position>,
    /// Stunned during the current turn. Such units skip one recovery.
    pub stunned_this_turn: bool,
}

impl Unit {
    /// Create a unit with the stats and skills of a roster role.
    #[must_use]
    pub fn from_role(id: UnitId, team: TeamId, role: &RoleSpec) -> Self {
        Self {
            id,
            team,
            role: role.name.to_string(),
            stats: role.stats,
            skills: SmallVec::from_slice(role.skills),
            state: UnitState::Standing,
            position: None,
            stunned_this_turn: false,
        }
    }

    /// Create a unit with explicit stats and no skills.
    #[must_use]
    pub fn new(id: UnitId, team: TeamId, role: impl Into<String>, stats: Stats) -> Self {
        Self {
            id,
            team,
            role: role.into(),
            stats,
            skills: SmallVec::new(),
            state: UnitState::Standing,
            position: None,
            stunned_this_turn: false,
        }
    }

    /// Add a skill.
    #[must_use]
    pub fn with_skill(mut self, skill: Skill) -> Self {
        if !self.skills.contains(&skill) {
            self.skills.push(skill);
        }
        self
    }

    #[must_use]
    pub fn has_skill(&self, skill: Skill) -> bool {
        self.skills.contains(&skill)
    }

    #[must_use]
    pub fn is_standing(&self) -> bool {
        self.state == UnitState::Standing
    }

    #[must_use]
    pub fn is_on_pitch(&self) -> bool {
        self.position.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        assert!(UnitState::Standing.exerts_tackle_zone());
        assert!(!UnitState::Prone.exerts_tackle_zone());
        assert!(UnitState::Stunned.is_down());
        assert!(UnitState::KnockedOut.is_removed());
        assert!(UnitState::Ejected.is_removed());
        assert!(!UnitState::Prone.is_removed());
    }

    #[test]
    fn test_with_skill_deduplicates() {
        let unit = Unit::new(UnitId(1), TeamId::HOME, "Lineman", Stats::new(6, 3, 3, 4, 9))
            .with_skill(Skill::Block)
            .with_skill(Skill::Block);
        assert_eq!(unit.skills.len(), 1);
        assert!(unit.has_skill(Skill::Block));
        assert!(!unit.is_on_pitch());
    }
}
