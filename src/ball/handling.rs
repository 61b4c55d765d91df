//! Ball transitions: pickup, catch, bounce, throw and quick pass.
//!
//! ## Bounces
//!
//! A bounce moves the ball one cell in a d8 direction, chosen among the
//! in-bounds neighbours of its current cell (see `pitch::DIRECTIONS`). Where
//! it lands decides what happens next:
//!
//! - a Standing unit must try to catch it
//! - a unit that is down cannot, so it bounces again
//! - an empty cell: it comes to rest
//!
//! Chains are capped by `MatchConfig::max_bounces`; at the cap the ball rests
//! where it is, or on the first free neighbour if a unit is standing there.
//!
//! ## Throw accuracy
//!
//! | Roll                                 | Result            |
//! |--------------------------------------|-------------------|
//! | natural 1, or modified total <= 1    | Fumble            |
//! | test passed                          | Accurate          |
//! | failed, modified total >= 3          | Inaccurate        |
//! | failed, modified total == 2          | Wildly inaccurate |

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Ball;
use crate::core::{EventKind, Match, Outcome, Transcript, TurnoverReason, UnitId};
use crate::dice::{DiceOutcome, Modifier, ModifierSource, RollKind};
use crate::pitch::Position;
use crate::units::{skill_modifiers, Check, Unit};

/// Longest legal throw, in cells.
pub const MAX_THROW_DISTANCE: i32 = 13;

/// Distance band of a throw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassRange {
    Quick,
    Short,
    Long,
    LongBomb,
}

impl PassRange {
    /// Band for a Chebyshev distance, or `None` if out of range.
    #[must_use]
    pub const fn from_distance(distance: i32) -> Option<Self> {
        match distance {
            1..=3 => Some(PassRange::Quick),
            4..=6 => Some(PassRange::Short),
            7..=12 => Some(PassRange::Long),
            13..=MAX_THROW_DISTANCE => Some(PassRange::LongBomb),
            _ => None,
        }
    }

    #[must_use]
    pub const fn modifier(self) -> i8 {
        match self {
            PassRange::Quick => 1,
            PassRange::Short => 0,
            PassRange::Long => -1,
            PassRange::LongBomb => -2,
        }
    }
}

/// How well a throw went.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassAccuracy {
    Accurate,
    Inaccurate,
    WildlyInaccurate,
    Fumble,
}

impl PassAccuracy {
    /// Classify a throw test.
    #[must_use]
    pub fn classify(roll: &DiceOutcome) -> Self {
        let natural = roll.raw_total();
        let modified = roll.modified_total();

        if natural == 1 || modified <= 1 {
            PassAccuracy::Fumble
        } else if roll.success {
            PassAccuracy::Accurate
        } else if modified >= 3 {
            PassAccuracy::Inaccurate
        } else {
            PassAccuracy::WildlyInaccurate
        }
    }
}

/// Skill modifiers for `check` plus enemy tackle zones on the unit's cell.
fn handling_modifiers(m: &Match, unit: &Unit, pos: Position, check: Check) -> Vec<Modifier> {
    let mut mods: Vec<Modifier> = skill_modifiers(&unit.skills, check).into_vec();
    mods.extend(Modifier::tackle_zones(m.tackle_zones(pos, unit.team)));
    mods
}

/// One random step from `from`, among in-bounds neighbours.
pub(crate) fn scatter(m: &mut Match, log: &mut Transcript, from: Position) -> Position {
    let options = m.pitch.neighbors(from);
    let roll = m.dice.direction();
    let face = roll.raw_total();
    log.roll(roll);

    if options.is_empty() {
        return from;
    }
    options[(usize::from(face.max(1)) - 1) % options.len()]
}

/// Scatter the ball once from `from` and let it land.
///
/// `depth` counts the bounces already taken in this chain. Once it reaches
/// `max_bounces` the ball settles next to `from` without another roll.
pub(crate) fn bounce(m: &mut Match, log: &mut Transcript, from: Position, depth: u8) {
    if depth >= m.config().max_bounces {
        debug!(%from, depth, "bounce chain capped");
        rest_nearby(m, log, from);
        return;
    }
    let to = scatter(m, log, from);
    debug!(%from, %to, depth, "ball bounces");
    log.event(EventKind::BallBounced { from, to });
    land(m, log, to, depth.saturating_add(1), false);
}

/// Resolve the ball arriving at `at`.
///
/// With `diving` set, a ball reaching an empty cell may be caught by the
/// lowest-id Standing unit adjacent to it.
fn land(m: &mut Match, log: &mut Transcript, at: Position, depth: u8, diving: bool) {
    let occupant = m
        .pitch
        .unit_at(at)
        .and_then(|id| m.unit(id))
        .map(|u| (u.id, u.is_standing()));

    match occupant {
        Some((id, true)) => {
            catch(m, log, id, depth);
        }
        Some((_, false)) => bounce(m, log, at, depth),
        None => {
            let diver = diving
                .then(|| {
                    m.pitch
                        .adjacent_units(at, &m.units, |u| u.is_standing())
                        .first()
                        .copied()
                })
                .flatten();
            match diver {
                Some(id) => {
                    m.set_ball(Ball::Loose(at), log);
                    catch(m, log, id, depth);
                }
                None => m.set_ball(Ball::Loose(at), log),
            }
        }
    }
}

fn rest_nearby(m: &mut Match, log: &mut Transcript, at: Position) {
    let spot = free_spot_near(m, at);
    m.set_ball(Ball::Loose(spot), log);
}

/// `at` if nobody stands there, else its first free neighbour in scatter
/// order, else `at` anyway.
pub(crate) fn free_spot_near(m: &Match, at: Position) -> Position {
    if !m.pitch.is_occupied(at) {
        return at;
    }
    m.pitch
        .neighbors(at)
        .into_iter()
        .find(|p| !m.pitch.is_occupied(*p))
        .unwrap_or(at)
}

/// Put the ball back on the centre spot for a restart (kickoff, second
/// half, after a touchdown). A unit standing on the spot pushes it to the
/// first free neighbour. Whoever carried the ball loses it.
pub(crate) fn place_for_restart(m: &mut Match, log: &mut Transcript) -> Position {
    let at = free_spot_near(m, m.pitch.centre());
    if let Some(carrier) = m.ball.carrier() {
        debug!(unit = %carrier, "ball taken back for the restart");
    }
    m.set_ball(Ball::Loose(at), log);
    log.event(EventKind::BallPlaced { at });
    at
}

/// A unit tries to catch the ball. On failure the ball bounces off it.
pub(crate) fn catch(m: &mut Match, log: &mut Transcript, id: UnitId, depth: u8) -> bool {
    let Some(unit) = m.unit(id).cloned() else {
        return false;
    };
    let Some(pos) = unit.position else {
        return false;
    };

    let mods = handling_modifiers(m, &unit, pos, Check::Catch);
    let roll = m.skill_test(log, RollKind::Catch, id, unit.stats.agility, &mods);

    if roll.success {
        m.set_ball(Ball::Carried(id), log);
        log.event(EventKind::BallCaught { unit: id });
        log.note(format!("{id} catches the ball"));
        true
    } else {
        log.event(EventKind::CatchFailed { unit: id });
        log.note(format!("{id} fails to catch the ball"));
        m.set_ball(Ball::Loose(pos), log);
        bounce(m, log, pos, depth);
        false
    }
}

/// A unit standing on the loose ball tries to pick it up.
pub fn pickup(m: &mut Match, log: &mut Transcript, id: UnitId) -> Outcome {
    let Some(unit) = m.unit(id).cloned() else {
        return Outcome::Success;
    };
    let Some(pos) = unit.position else {
        return Outcome::Success;
    };

    let mods = handling_modifiers(m, &unit, pos, Check::Pickup);
    let roll = m.skill_test(log, RollKind::Pickup, id, unit.stats.agility, &mods);

    if roll.success {
        m.set_ball(Ball::Carried(id), log);
        log.event(EventKind::BallPickedUp { unit: id });
        log.note(format!("{id} picks up the ball"));
        Outcome::Success
    } else {
        log.event(EventKind::PickupFailed { unit: id });
        log.note(format!("{id} fails to pick up the ball"));
        bounce(m, log, pos, 0);
        Outcome::Turnover(TurnoverReason::FailedPickup)
    }
}

/// Throw the ball from the carrier to `target`.
///
/// Anything short of the thrower's team holding the ball afterwards is a
/// turnover.
pub fn throw(m: &mut Match, log: &mut Transcript, id: UnitId, target: Position) -> Outcome {
    let Some(unit) = m.unit(id).cloned() else {
        return Outcome::Success;
    };
    let Some(from) = unit.position else {
        return Outcome::Success;
    };
    let Some(range) = PassRange::from_distance(from.distance(target)) else {
        return Outcome::Turnover(TurnoverReason::IncompletePass);
    };

    let mut mods = handling_modifiers(m, &unit, from, Check::Throw);
    mods.push(Modifier::new(ModifierSource::Distance, range.modifier()));

    let roll = m.skill_test(log, RollKind::Throw, id, unit.stats.passing, &mods);
    let accuracy = PassAccuracy::classify(&roll);
    debug!(unit = %id, %target, ?range, ?accuracy, "throw");
    log.event(EventKind::BallThrown {
        unit: id,
        target,
        accuracy,
    });
    log.note(format!("{id} throws towards {target}: {accuracy:?}"));

    match accuracy {
        PassAccuracy::Fumble => {
            m.set_ball(Ball::Loose(from), log);
            bounce(m, log, from, 0);
            return Outcome::Turnover(TurnoverReason::FumbledPass);
        }
        PassAccuracy::Accurate => land(m, log, target, 0, false),
        PassAccuracy::Inaccurate => {
            let at = scatter(m, log, target);
            land(m, log, at, 0, true);
        }
        PassAccuracy::WildlyInaccurate => {
            let mut at = from;
            for _ in 0..3 {
                at = scatter(m, log, at);
            }
            land(m, log, at, 0, false);
        }
    }

    if m.possession() == Some(unit.team) {
        Outcome::Success
    } else {
        Outcome::Turnover(TurnoverReason::IncompletePass)
    }
}

/// Hand the ball to an adjacent teammate. On a failed test the ball drops
/// at the passer's cell.
pub fn quick_pass(m: &mut Match, log: &mut Transcript, passer: UnitId, receiver: UnitId) -> Outcome {
    let (Some(giver), Some(taker)) = (m.unit(passer).cloned(), m.unit(receiver).cloned()) else {
        return Outcome::Success;
    };
    let (Some(from), Some(at)) = (giver.position, taker.position) else {
        return Outcome::Success;
    };

    let mods = handling_modifiers(m, &taker, at, Check::Catch);
    let roll = m.skill_test(log, RollKind::HandOff, receiver, taker.stats.agility, &mods);

    if roll.success {
        m.set_ball(Ball::Carried(receiver), log);
        log.event(EventKind::HandedOff {
            from: passer,
            to: receiver,
        });
        log.note(format!("{passer} hands the ball to {receiver}"));
        Outcome::Success
    } else {
        m.set_ball(Ball::Loose(from), log);
        log.event(EventKind::CatchFailed { unit: receiver });
        log.note(format!("{receiver} fumbles the hand-off"));
        Outcome::Turnover(TurnoverReason::FailedHandOff)
    }
}
