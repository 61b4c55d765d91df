//! Skills as modifier tags.
//!
//! A skill carries no behaviour of its own. Resolvers ask the table in
//! `Skill::modifier` what a skill adds to a given check, or test for
//! membership (`Unit::has_skill`) when a skill changes a rule rather than a
//! number.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::dice::{Modifier, ModifierSource};

/// A named unit ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Skill {
    /// Ignore Both-Down when engaging or engaged.
    Block,
    /// +1 to dodge; turns Defender-Stumbles into a push.
    Dodge,
    /// +1 to pick up the ball.
    SureHands,
    /// +1 to catch.
    Catch,
    /// +1 to throw.
    Pass,
    /// +1 to rush.
    SureFeet,
    /// +1 to armor when this unit knocks someone down.
    MightyBlow,
    /// An injury roll of exactly 8 stuns instead of knocking out.
    ThickSkull,
    /// +1 to armor when booting.
    DirtyPlayer,
    /// -1 to the referee's roll when booting.
    SneakyGit,
    /// +1 to dodge, +1 to injury rolls against this unit.
    Stunty,
}

/// The checks a skill can modify.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Check {
    Dodge,
    Rush,
    Pickup,
    Catch,
    Throw,
    /// Armor roll made against someone this unit knocked down.
    InflictArmor,
    /// Injury roll made against this unit.
    SufferInjury,
    /// Armor roll made against someone this unit booted.
    Foul,
    /// Referee roll made against this unit after a boot.
    Referee,
}

impl Skill {
    /// The modifier this skill contributes to `check`, if any.
    #[must_use]
    pub const fn modifier(self, check: Check) -> Option<i8> {
        match (self, check) {
            (Skill::Dodge, Check::Dodge)
            | (Skill::Stunty, Check::Dodge)
            | (Skill::SureHands, Check::Pickup)
            | (Skill::Catch, Check::Catch)
            | (Skill::Pass, Check::Throw)
            | (Skill::SureFeet, Check::Rush)
            | (Skill::MightyBlow, Check::InflictArmor)
            | (Skill::Stunty, Check::SufferInjury)
            | (Skill::DirtyPlayer, Check::Foul) => Some(1),
            (Skill::SneakyGit, Check::Referee) => Some(-1),
            _ => None,
        }
    }
}

/// Collect the modifiers a skill set contributes to `check`.
#[must_use]
pub fn skill_modifiers(skills: &[Skill], check: Check) -> SmallVec<[Modifier; 2]> {
    skills
        .iter()
        .filter_map(|&skill| {
            skill
                .modifier(check)
                .map(|value| Modifier::new(ModifierSource::Skill(skill), value))
        })
        .collect()
}
