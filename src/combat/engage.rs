//! Engagement: the strength contest between two adjacent Standing units.
//!
//! ## Dice
//!
//! | Strength                          | Dice | Chooser  |
//! |-----------------------------------|------|----------|
//! | attacker more than twice defender | 3    | attacker |
//! | attacker stronger                 | 2    | attacker |
//! | equal                             | 1    | -        |
//! | attacker weaker                   | 1    | defender |
//!
//! ## Faces
//!
//! 1 Attacker Down, 2 Both Down, 3-4 Push, 5 Defender Stumbles,
//! 6 Defender Down. A strictly stronger attacker reads Attacker Down as Push.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::injury::knock_down;
use crate::ball::{handling, Ball};
use crate::core::{EventKind, Match, Outcome, Transcript, TurnoverReason, UnitId};
use crate::dice::RollKind;
use crate::pitch::Position;
use crate::units::{skill_modifiers, Check, Skill, Unit};

/// Result of one engagement die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockFace {
    AttackerDown,
    BothDown,
    Push,
    DefenderStumbles,
    DefenderDown,
}

impl BlockFace {
    /// Map a d6 face.
    #[must_use]
    pub const fn from_face(face: u8) -> Self {
        match face {
            0 | 1 => BlockFace::AttackerDown,
            2 => BlockFace::BothDown,
            3 | 4 => BlockFace::Push,
            5 => BlockFace::DefenderStumbles,
            _ => BlockFace::DefenderDown,
        }
    }
}

/// Who picks the face to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chooser {
    Attacker,
    Defender,
}

/// Number of dice and who chooses, from the two strengths.
#[must_use]
pub const fn dice_count(attacker: u8, defender: u8) -> (u8, Chooser) {
    if attacker as u16 > 2 * defender as u16 {
        (3, Chooser::Attacker)
    } else if attacker > defender {
        (2, Chooser::Attacker)
    } else if attacker == defender {
        (1, Chooser::Attacker)
    } else {
        (1, Chooser::Defender)
    }
}

/// How good a face is for the attacker, given both units' skills.
fn attacker_value(face: BlockFace, attacker: &Unit, defender: &Unit) -> u8 {
    let att_block = attacker.has_skill(Skill::Block);
    let def_block = defender.has_skill(Skill::Block);
    match face {
        BlockFace::DefenderDown => 6,
        BlockFace::DefenderStumbles if !defender.has_skill(Skill::Dodge) => 5,
        BlockFace::BothDown if att_block && !def_block => 4,
        BlockFace::Push | BlockFace::DefenderStumbles => 3,
        BlockFace::BothDown if att_block => 2,
        BlockFace::BothDown if !def_block => 1,
        BlockFace::BothDown | BlockFace::AttackerDown => 0,
    }
}

/// Pick a face from the rolled ones. Ties keep the first rolled.
#[must_use]
pub fn choose_face(faces: &[BlockFace], chooser: Chooser, attacker: &Unit, defender: &Unit) -> Option<BlockFace> {
    let mut best: Option<(BlockFace, u8)> = None;
    for &face in faces {
        let value = attacker_value(face, attacker, defender);
        let better = match (best, chooser) {
            (None, _) => true,
            (Some((_, current)), Chooser::Attacker) => value > current,
            (Some((_, current)), Chooser::Defender) => value < current,
        };
        if better {
            best = Some((face, value));
        }
    }
    best.map(|(face, _)| face)
}

/// Cells a defender can be pushed into, in preference order.
fn push_candidates(attacker: Position, defender: Position) -> [Position; 3] {
    let (dx, dy) = attacker.direction_to(defender);
    if dx != 0 && dy != 0 {
        [
            defender.offset(dx, dy),
            defender.offset(dx, 0),
            defender.offset(0, dy),
        ]
    } else if dx != 0 {
        [
            defender.offset(dx, 0),
            defender.offset(dx, -1),
            defender.offset(dx, 1),
        ]
    } else {
        [
            defender.offset(0, dy),
            defender.offset(-1, dy),
            defender.offset(1, dy),
        ]
    }
}

/// Push the defender one cell away from the attacker, if there is room.
fn push(m: &mut Match, log: &mut Transcript, attacker: Position, defender: UnitId) {
    let Some(from) = m.unit(defender).and_then(|u| u.position) else {
        return;
    };
    let Some(to) = push_candidates(attacker, from)
        .into_iter()
        .find(|p| m.pitch.in_bounds(*p) && !m.pitch.is_occupied(*p))
    else {
        debug!(unit = %defender, "no room to push");
        return;
    };

    m.relocate(defender, to, log);
    log.event(EventKind::UnitPushed {
        unit: defender,
        from,
        to,
    });
    log.note(format!("{defender} is pushed to {to}"));

    if m.ball == Ball::Loose(to) {
        handling::bounce(m, log, to, 0);
    }
}

/// Resolve an engagement between two adjacent Standing units.
pub fn engage(m: &mut Match, log: &mut Transcript, attacker: UnitId, defender: UnitId) -> Outcome {
    let (Some(att), Some(def)) = (m.unit(attacker).cloned(), m.unit(defender).cloned()) else {
        return Outcome::Success;
    };
    let Some(att_pos) = att.position else {
        return Outcome::Success;
    };

    let (count, chooser) = dice_count(att.stats.strength, def.stats.strength);
    let pool = m.dice.pool(RollKind::Engagement, count);
    let stronger = att.stats.strength > def.stats.strength;
    let faces: Vec<BlockFace> = pool
        .values
        .iter()
        .map(|&face| match BlockFace::from_face(face) {
            BlockFace::AttackerDown if stronger => BlockFace::Push,
            other => other,
        })
        .collect();
    log.roll(pool);

    let Some(result) = choose_face(&faces, chooser, &att, &def) else {
        return Outcome::Success;
    };
    debug!(%attacker, %defender, ?faces, ?result, "engagement");
    log.event(EventKind::Engagement {
        attacker,
        defender,
        result,
    });
    log.note(format!("{attacker} engages {defender}: {result:?}"));

    let mighty_blow = skill_modifiers(&att.skills, Check::InflictArmor);
    let mut attacker_fell = false;

    match result {
        BlockFace::AttackerDown => {
            knock_down(m, log, attacker, &[]);
            attacker_fell = true;
        }
        BlockFace::BothDown => {
            if !def.has_skill(Skill::Block) {
                knock_down(m, log, defender, &mighty_blow);
            }
            if !att.has_skill(Skill::Block) {
                knock_down(m, log, attacker, &[]);
                attacker_fell = true;
            }
        }
        BlockFace::Push => push(m, log, att_pos, defender),
        BlockFace::DefenderStumbles if def.has_skill(Skill::Dodge) => {
            push(m, log, att_pos, defender);
        }
        BlockFace::DefenderStumbles | BlockFace::DefenderDown => {
            push(m, log, att_pos, defender);
            knock_down(m, log, defender, &mighty_blow);
        }
    }

    if attacker_fell {
        Outcome::Turnover(TurnoverReason::UnitDown)
    } else {
        Outcome::Success
    }
}
