//! Executing movement.

use tracing::debug;

use super::pathfinder::{step_tests, RUSH_TARGET};
use crate::ball::{handling, Ball};
use crate::combat::knock_down;
use crate::core::{EventKind, Match, Outcome, Transcript, TurnoverReason, UnitId};
use crate::dice::{Modifier, RollKind};
use crate::pitch::Position;
use crate::units::{skill_modifiers, Check, UnitState};

/// Walk `id` along `path`, one cell at a time.
///
/// Each cell resolves its dodge and then its rush. The first failure leaves
/// the unit down in the cell it was stepping into and ends the move with a
/// turnover. Arriving on the loose ball ends the move with a pickup.
pub fn walk(m: &mut Match, log: &mut Transcript, id: UnitId, path: &[Position]) -> Outcome {
    let Some(unit) = m.unit(id).cloned() else {
        return Outcome::Success;
    };
    let Some(mut from) = unit.position else {
        return Outcome::Success;
    };

    for (i, &to) in path.iter().enumerate() {
        let tests = step_tests(m, &unit, from, to, i + 1);

        if tests.dodge.is_some() {
            let mut mods = skill_modifiers(&unit.skills, Check::Dodge).into_vec();
            mods.extend(Modifier::tackle_zones(m.tackle_zones(to, unit.team)));
            let roll = m.skill_test(log, RollKind::Dodge, id, unit.stats.agility, &mods);
            if !roll.success {
                debug!(unit = %id, %from, %to, "dodge failed");
                log.event(EventKind::DodgeFailed { unit: id });
                return fall_into(m, log, id, from, to, TurnoverReason::FailedDodge);
            }
        }

        if tests.rush.is_some() {
            let mods = skill_modifiers(&unit.skills, Check::Rush);
            let roll = m.skill_test(log, RollKind::Rush, id, RUSH_TARGET, &mods);
            if !roll.success {
                debug!(unit = %id, %from, %to, "rush failed");
                log.event(EventKind::RushFailed { unit: id });
                return fall_into(m, log, id, from, to, TurnoverReason::FailedRush);
            }
        }

        step(m, log, id, from, to);
        from = to;

        if m.ball == Ball::Loose(to) {
            return handling::pickup(m, log, id);
        }
    }

    Outcome::Success
}

fn step(m: &mut Match, log: &mut Transcript, id: UnitId, from: Position, to: Position) {
    if m.relocate(id, to, log) {
        log.event(EventKind::UnitMoved { unit: id, from, to });
    }
}

fn fall_into(
    m: &mut Match,
    log: &mut Transcript,
    id: UnitId,
    from: Position,
    to: Position,
    reason: TurnoverReason,
) -> Outcome {
    step(m, log, id, from, to);
    log.note(format!("{id} falls at {to}"));
    knock_down(m, log, id, &[]);
    if m.ball == Ball::Loose(to) {
        handling::bounce(m, log, to, 0);
    }
    Outcome::Turnover(reason)
}

/// A Prone unit gets back on its feet.
pub fn stand_up(m: &mut Match, log: &mut Transcript, id: UnitId) -> Outcome {
    m.set_state(id, UnitState::Standing, log);
    log.event(EventKind::UnitStoodUp { unit: id });
    log.note(format!("{id} stands up"));
    Outcome::Success
}
