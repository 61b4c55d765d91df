//! Roster definitions: which roles a team may buy and at what price.

use serde::{Deserialize, Serialize};

use super::skills::Skill;
use super::unit::Stats;

/// One purchasable role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoleSpec {
    pub name: &'static str,
    pub cost: u32,
    pub stats: Stats,
    pub skills: &'static [Skill],
    /// Maximum number of this role a team may own.
    pub max: u8,
}

const WATCH_ROLES: &[RoleSpec] = &[
    RoleSpec {
        name: "Lineman",
        cost: 50_000,
        stats: Stats::new(6, 3, 3, 4, 9),
        skills: &[],
        max: 16,
    },
    RoleSpec {
        name: "Thrower",
        cost: 80_000,
        stats: Stats::new(6, 3, 3, 2, 9),
        skills: &[Skill::Pass, Skill::SureHands],
        max: 2,
    },
    RoleSpec {
        name: "Catcher",
        cost: 65_000,
        stats: Stats::new(8, 2, 3, 5, 8),
        skills: &[Skill::Catch, Skill::Dodge],
        max: 4,
    },
    RoleSpec {
        name: "Blitzer",
        cost: 85_000,
        stats: Stats::new(7, 3, 3, 4, 9),
        skills: &[Skill::Block],
        max: 4,
    },
];

const ACADEMY_ROLES: &[RoleSpec] = &[
    RoleSpec {
        name: "Apprentice",
        cost: 45_000,
        stats: Stats::new(6, 2, 3, 4, 8),
        skills: &[Skill::Dodge, Skill::Stunty, Skill::ThickSkull],
        max: 16,
    },
    RoleSpec {
        name: "Senior",
        cost: 90_000,
        stats: Stats::new(4, 4, 4, 5, 10),
        skills: &[],
        max: 4,
    },
    RoleSpec {
        name: "Gargoyle",
        cost: 115_000,
        stats: Stats::new(4, 5, 5, 5, 10),
        skills: &[Skill::MightyBlow],
        max: 1,
    },
];

/// The two roster kinds a team can field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RosterKind {
    /// Balanced humans: a thrower, fast catchers and blocking blitzers.
    Watch,
    /// Cheap agile apprentices backed by a few very strong bruisers.
    Academy,
}

impl RosterKind {
    /// All roles on this roster.
    #[must_use]
    pub const fn roles(self) -> &'static [RoleSpec] {
        match self {
            RosterKind::Watch => WATCH_ROLES,
            RosterKind::Academy => ACADEMY_ROLES,
        }
    }

    /// Look up a role by name (case-insensitive).
    #[must_use]
    pub fn role(self, name: &str) -> Option<&'static RoleSpec> {
        self.roles()
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// Price of one team reroll token.
    #[must_use]
    pub const fn reroll_cost(self) -> u32 {
        match self {
            RosterKind::Watch => 50_000,
            RosterKind::Academy => 60_000,
        }
    }
}
