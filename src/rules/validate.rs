//! Legality checks. Nothing here mutates the match or rolls a die.

use crate::ball::{PassRange, MAX_THROW_DISTANCE};
use crate::core::{ActionError, ActionKind, ActionRequest, IllegalAction, Match, UnitId};
use crate::pitch::Position;
use crate::units::{Unit, UnitState};

use super::turn::Phase;

/// Check a request against the current state.
///
/// Order: phase, turn owner, unit state, per-unit activation, per-turn
/// quota, then the action's own arguments.
pub fn validate(m: &Match, request: &ActionRequest) -> Result<(), ActionError> {
    match m.phase() {
        Phase::ActivePlay => {}
        Phase::Finished => return Err(ActionError::MatchConcluded),
        other => return Err(IllegalAction::WrongPhase(other).into()),
    }
    let Some(turn) = m.turn() else {
        return Err(IllegalAction::WrongPhase(m.phase()).into());
    };

    let id = request.unit();
    let unit = m.unit(id).ok_or(IllegalAction::UnknownUnit(id))?;
    if unit.team != turn.active {
        return Err(IllegalAction::NotYourTurn(unit.team).into());
    }
    if unit.position.is_none() {
        return Err(IllegalAction::NotOnPitch(id).into());
    }

    let kind = request.kind();
    check_unit_state(unit, kind)?;

    let activation = turn.activation(id);
    if kind.is_movement() && activation.moved {
        return Err(IllegalAction::AlreadyMoved(id).into());
    }
    if kind == ActionKind::Engage && activation.moved {
        return Err(IllegalAction::AlreadyMoved(id).into());
    }
    if activation.acted {
        return Err(IllegalAction::AlreadyActed(id).into());
    }
    if kind.is_once_per_turn() && turn.is_used(kind) {
        return Err(IllegalAction::QuotaExhausted(kind).into());
    }

    match request {
        ActionRequest::Move { path, .. } => {
            check_path(m, unit, path, true)?;
        }
        ActionRequest::StandUp { .. } => {
            let needed = m.config().stand_up_cost;
            if unit.stats.movement < needed {
                return Err(IllegalAction::InsufficientMovement {
                    unit: id,
                    needed,
                    remaining: unit.stats.movement,
                }
                .into());
            }
        }
        ActionRequest::Engage { target, .. } => {
            let from = unit.position.ok_or(IllegalAction::NotOnPitch(id))?;
            check_opponent(m, unit, *target, from, UnitState::Standing)?;
        }
        ActionRequest::Charge { path, target, .. } => {
            check_path(m, unit, path, false)?;
            let from = path
                .last()
                .copied()
                .or(unit.position)
                .ok_or(IllegalAction::NotOnPitch(id))?;
            check_opponent(m, unit, *target, from, UnitState::Standing)?;
        }
        ActionRequest::Throw { target, .. } => {
            check_carrier(m, id)?;
            if !m.pitch().in_bounds(*target) {
                return Err(IllegalAction::TargetOutOfBounds(*target).into());
            }
            let from = unit.position.ok_or(IllegalAction::NotOnPitch(id))?;
            let distance = from.distance(*target);
            if distance == 0 {
                return Err(IllegalAction::ThrowToSelf.into());
            }
            if PassRange::from_distance(distance).is_none() {
                return Err(IllegalAction::OutOfRange {
                    distance,
                    max: MAX_THROW_DISTANCE,
                }
                .into());
            }
        }
        ActionRequest::QuickPass { receiver, .. } => {
            check_carrier(m, id)?;
            let taker = m.unit(*receiver).ok_or(IllegalAction::UnknownUnit(*receiver))?;
            if taker.id == id || taker.team != unit.team {
                return Err(invalid(*receiver, "not a teammate"));
            }
            if !taker.is_standing() {
                return Err(invalid(*receiver, "receiver is not standing"));
            }
            check_adjacent(unit, taker)?;
        }
        ActionRequest::Boot { target, .. } => {
            let from = unit.position.ok_or(IllegalAction::NotOnPitch(id))?;
            check_opponent(m, unit, *target, from, UnitState::Prone)?;
        }
    }

    Ok(())
}

fn invalid(target: UnitId, reason: &'static str) -> ActionError {
    IllegalAction::InvalidTarget { target, reason }.into()
}

fn check_unit_state(unit: &Unit, kind: ActionKind) -> Result<(), ActionError> {
    match (kind, unit.state) {
        (ActionKind::StandUp, UnitState::Prone) => Ok(()),
        (ActionKind::StandUp, _) => Err(IllegalAction::NotProne(unit.id).into()),
        (_, UnitState::Standing) => Ok(()),
        (_, state) => Err(IllegalAction::UnitCannotAct {
            unit: unit.id,
            state,
        }
        .into()),
    }
}

fn check_carrier(m: &Match, id: UnitId) -> Result<(), ActionError> {
    if m.ball().carrier() == Some(id) {
        Ok(())
    } else {
        Err(IllegalAction::NotBallCarrier(id).into())
    }
}

fn check_adjacent(unit: &Unit, other: &Unit) -> Result<(), ActionError> {
    match (unit.position, other.position) {
        (Some(a), Some(b)) if a.is_adjacent(b) => Ok(()),
        (_, None) => Err(IllegalAction::NotOnPitch(other.id).into()),
        _ => Err(IllegalAction::NotAdjacent {
            unit: unit.id,
            target: other.id,
        }
        .into()),
    }
}

/// Target must be an opponent on the pitch, in `state`, adjacent to `from`.
fn check_opponent(
    m: &Match,
    unit: &Unit,
    target: UnitId,
    from: Position,
    state: UnitState,
) -> Result<(), ActionError> {
    let other = m.unit(target).ok_or(IllegalAction::UnknownUnit(target))?;
    if other.team == unit.team {
        return Err(invalid(target, "not an opponent"));
    }
    let Some(at) = other.position else {
        return Err(IllegalAction::NotOnPitch(target).into());
    };
    if other.state != state {
        let reason = match state {
            UnitState::Prone => "target is not prone",
            _ => "target is not standing",
        };
        return Err(invalid(target, reason));
    }
    if !from.is_adjacent(at) {
        return Err(IllegalAction::NotAdjacent {
            unit: unit.id,
            target,
        }
        .into());
    }
    Ok(())
}

/// Path shape: contiguous, on the pitch, through empty cells, within the
/// allowance plus rushes, touching the loose ball only as the last cell
/// (and not at all when `allow_pickup` is false).
fn check_path(m: &Match, unit: &Unit, path: &[Position], allow_pickup: bool) -> Result<(), ActionError> {
    if path.is_empty() {
        if allow_pickup {
            return Err(IllegalAction::EmptyPath.into());
        }
        return Ok(());
    }

    let max = usize::from(unit.stats.movement) + usize::from(m.config().max_rush_squares);
    if path.len() > max {
        return Err(IllegalAction::PathTooLong {
            len: path.len(),
            max,
        }
        .into());
    }

    let ball = m.ball().loose_at();
    let mut from = unit.position.ok_or(IllegalAction::NotOnPitch(unit.id))?;
    for (i, &cell) in path.iter().enumerate() {
        if !m.pitch().in_bounds(cell) {
            return Err(IllegalAction::PathOutOfBounds(cell).into());
        }
        if !from.is_adjacent(cell) {
            return Err(IllegalAction::PathNotContiguous(cell).into());
        }
        if m.pitch().is_occupied(cell) {
            return Err(IllegalAction::PathBlocked(cell).into());
        }
        if Some(cell) == ball && (!allow_pickup || i + 1 != path.len()) {
            return Err(IllegalAction::PathCrossesBall(cell).into());
        }
        from = cell;
    }
    Ok(())
}
