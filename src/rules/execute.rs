//! The single state-mutating entry point for play.

use tracing::{info, warn};

use super::turn::{finish_turn, TurnChange};
use super::validate::validate;
use crate::ball::handling;
use crate::combat;
use crate::core::{
    ActionError, ActionRequest, ActionResult, Delta, EventKind, Match, Outcome, Transcript,
    TurnoverReason,
};
use crate::movement;

/// Validate and resolve one request.
///
/// Illegal requests are rejected before any die is rolled and leave the
/// match untouched. A legal request always runs to completion; if it ends
/// in a turnover the turn is ended before this returns.
pub fn execute(m: &mut Match, request: &ActionRequest) -> Result<ActionResult, ActionError> {
    run(m, request, false)
}

/// As `execute`, but the first failed test of the action may be rerolled
/// with a team reroll token (at most one per team-turn).
pub fn execute_with_reroll(m: &mut Match, request: &ActionRequest) -> Result<ActionResult, ActionError> {
    run(m, request, true)
}

fn run(m: &mut Match, request: &ActionRequest, reroll: bool) -> Result<ActionResult, ActionError> {
    if let Err(err) = validate(m, request) {
        warn!(id = m.id(), unit = %request.unit(), kind = ?request.kind(), %err, "action rejected");
        return Err(err);
    }
    let Some(team) = m.active_team() else {
        return Err(ActionError::MatchConcluded);
    };

    let unit = request.unit();
    if let Some(turn) = m.turn.as_mut() {
        turn.consume(unit, request.kind());
    }

    let mut log = Transcript::new();
    let had_ball = m.possession() == Some(team);

    m.reroll_armed = reroll;
    let mut outcome = dispatch(m, &mut log, request);
    m.reroll_armed = false;

    if !outcome.is_turnover() {
        if score_touchdown(m, &mut log) {
            outcome = Outcome::Turnover(TurnoverReason::Touchdown);
        } else if had_ball && m.possession() != Some(team) {
            outcome = Outcome::Turnover(TurnoverReason::BallLost);
        }
    }

    if let Outcome::Turnover(reason) = outcome {
        if reason != TurnoverReason::Touchdown {
            info!(id = m.id(), %team, ?reason, "turnover");
        }
        log.event(EventKind::Turnover { team, reason });
    }

    let mut events = m.commit(&mut log);
    if let Outcome::Turnover(reason) = outcome {
        let TurnChange { events: turn_events, .. } = finish_turn(m, Some(reason));
        events.extend(turn_events);
    }

    Ok(ActionResult {
        request: request.clone(),
        outcome,
        description: log.describe(),
        dice: log.dice,
        deltas: log.deltas,
        events,
    })
}

/// Route a validated request to its resolver.
fn dispatch(m: &mut Match, log: &mut Transcript, request: &ActionRequest) -> Outcome {
    match request {
        ActionRequest::Move { unit, path } => movement::walk(m, log, *unit, path),
        ActionRequest::StandUp { unit } => movement::stand_up(m, log, *unit),
        ActionRequest::Engage { unit, target } => combat::engage(m, log, *unit, *target),
        ActionRequest::Charge { unit, path, target } => {
            let moved = movement::walk(m, log, *unit, path);
            if moved.is_turnover() {
                return moved;
            }
            combat::engage(m, log, *unit, *target)
        }
        ActionRequest::Throw { unit, target } => handling::throw(m, log, *unit, *target),
        ActionRequest::QuickPass { unit, receiver } => handling::quick_pass(m, log, *unit, *receiver),
        ActionRequest::Boot { unit, target } => combat::boot(m, log, *unit, *target),
    }
}

/// A Standing carrier in its scoring end zone scores. The ball goes back to
/// the centre spot.
fn score_touchdown(m: &mut Match, log: &mut Transcript) -> bool {
    let Some(carrier) = m.ball().carrier() else {
        return false;
    };
    let Some((team, pos, standing)) = m
        .unit(carrier)
        .and_then(|u| u.position.map(|p| (u.team, p, u.is_standing())))
    else {
        return false;
    };
    if !standing || !m.pitch().is_scoring_zone(pos, team) {
        return false;
    }

    m.score[team] += 1;
    let score = m.score[team];
    info!(id = m.id(), %team, unit = %carrier, score, "touchdown");
    log.delta(Delta::Score { team, score });
    log.event(EventKind::Touchdown {
        team,
        unit: carrier,
    });
    log.note(format!("touchdown for {team}"));

    handling::place_for_restart(m, log);
    true
}
