//! Match lifecycle and turn ownership.
//!
//! ```text
//! Setup ──(both ready)──> Kickoff ──kick_off──> ActivePlay ──(last turn)──> Finished
//!   ^                                                                          │
//!   └────────────────────────────── reset ─────────────────────────────────────┘
//! ```
//!
//! During ActivePlay the active team alternates each time a turn ends,
//! voluntarily or on a turnover. Each team plays `turns_per_half` turns per
//! half; home opens the first half, away the second.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::info;

use super::engine::GameResult;
use crate::ball::handling;
use crate::core::{
    ActionError, ActionKind, EventKind, IllegalAction, Match, MatchEvent, SetupError, TeamId,
    TeamMap, Transcript, TurnoverReason, UnitId,
};
use crate::units::UnitState;

/// Match lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Buying and placing units.
    Setup,
    /// Both teams ready, waiting for the kickoff.
    Kickoff,
    ActivePlay,
    Finished,
}

/// What a unit has done this turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    /// Used its movement (Move, Charge or Stand Up).
    pub moved: bool,
    /// Took a non-movement action (Engage, Charge, Throw, QuickPass, Boot).
    pub acted: bool,
}

/// Bookkeeping for the turn in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub active: TeamId,
    activations: FxHashMap<UnitId, Activation>,
    used: SmallVec<[ActionKind; 4]>,
    /// A team reroll has been spent this turn.
    pub reroll_used: bool,
    /// Set when the turn ended on a turnover.
    pub turnover: Option<TurnoverReason>,
}

impl TurnState {
    #[must_use]
    pub fn new(active: TeamId) -> Self {
        Self {
            active,
            activations: FxHashMap::default(),
            used: SmallVec::new(),
            reroll_used: false,
            turnover: None,
        }
    }

    #[must_use]
    pub fn activation(&self, unit: UnitId) -> Activation {
        self.activations.get(&unit).copied().unwrap_or_default()
    }

    /// Whether a once-per-turn action has been used.
    #[must_use]
    pub fn is_used(&self, kind: ActionKind) -> bool {
        self.used.contains(&kind)
    }

    /// Record that `unit` is taking an action of `kind`.
    pub(crate) fn consume(&mut self, unit: UnitId, kind: ActionKind) {
        let entry = self.activations.entry(unit).or_default();
        match kind {
            ActionKind::Move | ActionKind::StandUp => entry.moved = true,
            ActionKind::Charge => {
                entry.moved = true;
                entry.acted = true;
            }
            ActionKind::Engage | ActionKind::Throw | ActionKind::QuickPass | ActionKind::Boot => {
                entry.acted = true;
            }
        }
        if kind.is_once_per_turn() && !self.used.contains(&kind) {
            self.used.push(kind);
        }
    }
}

/// What `end_turn` (or a turnover) changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnChange {
    pub ended: TeamId,
    /// The new active team, `None` once the match is Finished.
    pub next: Option<TeamId>,
    pub half: u8,
    pub phase: Phase,
    pub events: Vec<MatchEvent>,
}

pub(crate) fn change_phase(m: &mut Match, to: Phase) -> MatchEvent {
    let from = m.phase;
    m.phase = to;
    info!(id = m.id(), ?from, ?to, "phase change");
    m.record(EventKind::PhaseChanged { from, to })
}

/// Put the ball at the centre spot and start the first half.
///
/// Home is active first.
pub fn kick_off(m: &mut Match) -> Result<Vec<MatchEvent>, SetupError> {
    if m.phase != Phase::Kickoff {
        return Err(SetupError::WrongPhase(m.phase));
    }

    let mut events = vec![change_phase(m, Phase::ActivePlay)];
    events.extend(start_half(m, 1, TeamId::HOME));
    Ok(events)
}

fn start_half(m: &mut Match, half: u8, first: TeamId) -> Vec<MatchEvent> {
    m.half = half;
    m.turn_counters = TeamMap::with_value(0);

    let mut log = Transcript::new();
    let at = handling::place_for_restart(m, &mut log);

    info!(id = m.id(), half, %first, %at, "kickoff");
    let mut events = vec![m.record(EventKind::KickedOff {
        half,
        receiving: first,
    })];
    events.extend(m.commit(&mut log));
    events.push(start_turn(m, first));
    events
}

fn start_turn(m: &mut Match, team: TeamId) -> MatchEvent {
    m.turn_counters[team] += 1;
    m.turn = Some(TurnState::new(team));
    let turn = m.turn_counters[team];
    info!(id = m.id(), %team, turn, half = m.half, "turn start");
    m.record(EventKind::TurnStarted { team, turn })
}

/// Voluntarily end `team`'s turn.
///
/// Fails with `MatchConcluded` once the match is Finished, without touching
/// any counter.
pub fn end_turn(m: &mut Match, team: TeamId) -> Result<TurnChange, ActionError> {
    match m.phase {
        Phase::Finished => return Err(ActionError::MatchConcluded),
        Phase::ActivePlay => {}
        other => return Err(IllegalAction::WrongPhase(other).into()),
    }
    if m.active_team() != Some(team) {
        return Err(IllegalAction::NotYourTurn(team).into());
    }
    Ok(finish_turn(m, None))
}

/// End the active team's turn and hand over (or end the half / match).
pub(crate) fn finish_turn(m: &mut Match, turnover: Option<TurnoverReason>) -> TurnChange {
    let Some(ended) = m.active_team() else {
        return TurnChange {
            ended: TeamId::HOME,
            next: None,
            half: m.half,
            phase: m.phase,
            events: Vec::new(),
        };
    };
    if let Some(turn) = m.turn.as_mut() {
        turn.turnover = turnover;
    }

    let mut events = recover_stunned(m, ended);
    events.push(m.record(EventKind::TurnEnded { team: ended, turnover }));

    let per_half = m.config().turns_per_half;
    let half_over = TeamId::both().all(|t| m.turn_counters[t] >= per_half);

    let next = if !half_over {
        let next = ended.opponent();
        events.push(start_turn(m, next));
        Some(next)
    } else if m.half < 2 {
        events.push(m.record(EventKind::HalfEnded { half: m.half }));
        let half = m.half + 1;
        events.extend(start_half(m, half, TeamId::AWAY));
        Some(TeamId::AWAY)
    } else {
        events.push(m.record(EventKind::HalfEnded { half: m.half }));
        m.turn = None;
        events.push(change_phase(m, Phase::Finished));
        let result = GameResult::from_score(&m.score);
        info!(id = m.id(), ?result, "match finished");
        events.push(m.record(EventKind::MatchFinished { result }));
        None
    };

    TurnChange {
        ended,
        next,
        half: m.half,
        phase: m.phase,
        events,
    }
}

/// Stunned units of `team` recover to Prone unless they were stunned during
/// the turn now ending. Every fresh-stun marker is then cleared.
fn recover_stunned(m: &mut Match, team: TeamId) -> Vec<MatchEvent> {
    let mut log = Transcript::new();
    let ids: Vec<UnitId> = m.units.keys().copied().collect();

    for id in ids {
        let Some(unit) = m.unit(id) else { continue };
        if unit.team == team && unit.state == UnitState::Stunned && !unit.stunned_this_turn {
            m.set_state(id, UnitState::Prone, &mut log);
            log.event(EventKind::Recovered { unit: id });
        }
        if let Some(unit) = m.unit_mut(id) {
            unit.stunned_this_turn = false;
        }
    }
    m.commit(&mut log)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_movement_and_action() {
        let mut turn = TurnState::new(TeamId::HOME);
        let unit = UnitId(1);

        turn.consume(unit, ActionKind::Move);
        assert!(turn.activation(unit).moved);
        assert!(!turn.activation(unit).acted);

        turn.consume(unit, ActionKind::Throw);
        assert!(turn.activation(unit).acted);
        assert!(turn.is_used(ActionKind::Throw));
        assert!(!turn.is_used(ActionKind::Move));
    }

    #[test]
    fn test_charge_is_move_and_action() {
        let mut turn = TurnState::new(TeamId::AWAY);
        turn.consume(UnitId(2), ActionKind::Charge);
        let activation = turn.activation(UnitId(2));
        assert!(activation.moved && activation.acted);
        assert!(turn.is_used(ActionKind::Charge));
    }
}
