//! Units, teams, rosters and skills.
//!
//! - `Unit`: stats, skills, state and (optional) position
//! - `Team`: owned units, treasury, reroll tokens, ready flag
//! - `RosterKind`: the purchasable roles and their prices
//! - `Skill`: modifier tags looked up by the resolvers

mod roster;
mod skills;
mod team;
mod unit;

pub use roster::{RoleSpec, RosterKind};
pub use skills::{skill_modifiers, Check, Skill};
pub use team::Team;
pub use unit::{Stats, Unit, UnitState};

use crate::core::UnitId;

/// The match's unit table. Ordered so iteration is deterministic.
pub type Units = im::OrdMap<UnitId, Unit>;
