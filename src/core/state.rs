//! Match state: the root aggregate.
//!
//! ## Match
//!
//! Owns everything: configuration, phase, teams, the unit table, the pitch,
//! the ball, the current turn, scores, the event log, the roll log, the
//! message log and the dice stream.
//!
//! Callers read through accessors. Mutation goes through the setup ledger,
//! `rules::execute` and `rules::end_turn`; the low-level mutators below are
//! crate-private and keep the pitch occupancy, unit positions and ball in
//! step with each other.
//!
//! Uses `im` persistent collections for the unit table and logs so a match
//! can be cloned cheaply (what-if analysis, snapshots).

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::action::{Delta, Transcript};
use super::config::MatchConfig;
use super::error::SnapshotError;
use super::event::{EventKind, MatchEvent, Message, RollRecord};
use super::ids::{TeamId, TeamMap, UnitId};
use super::rng::DiceStream;
use crate::ball::Ball;
use crate::dice::{DiceOutcome, DiceResolver, Modifier, RollKind};
use crate::pitch::{Pitch, Position};
use crate::rules::{GameResult, Phase, TurnState};
use crate::stats::MatchStats;
use crate::units::{RosterKind, Team, Unit, UnitState, Units};

/// Compact record of a match, kept after it is archived.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: String,
    pub phase: Phase,
    pub score: TeamMap<u8>,
    pub result: Option<GameResult>,
    pub turns_played: TeamMap<u8>,
    /// Units knocked out, hurt or ejected, per team.
    pub removed: TeamMap<u8>,
    pub events: usize,
}

/// Complete state of one match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Match {
    id: String,
    config: MatchConfig,

    // === Progression ===
    pub(crate) phase: Phase,
    pub(crate) half: u8,
    pub(crate) turn: Option<TurnState>,
    pub(crate) turn_counters: TeamMap<u8>,
    pub(crate) score: TeamMap<u8>,

    // === Board ===
    pub(crate) teams: TeamMap<Team>,
    pub(crate) units: Units,
    pub(crate) pitch: Pitch,
    pub(crate) ball: Ball,

    // === Logs ===
    events: Vector<MatchEvent>,
    rolls: Vector<RollRecord>,
    messages: Vector<Message>,

    // === Dice ===
    pub(crate) dice: DiceResolver,
    /// Set for the duration of one `execute_with_reroll` call.
    pub(crate) reroll_armed: bool,

    next_unit_id: u32,
    next_seq: u64,
}

impl Match {
    /// Create a match in Setup.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        config: MatchConfig,
        rosters: TeamMap<RosterKind>,
        dice: DiceStream,
    ) -> Self {
        let pitch = Pitch::new(config.pitch_width, config.pitch_height, config.end_zone_depth);
        let teams = TeamMap::new(|t| Team::new(t, rosters[t], config.starting_budget));

        Self {
            id: id.into(),
            config,
            phase: Phase::Setup,
            half: 0,
            turn: None,
            turn_counters: TeamMap::with_value(0),
            score: TeamMap::with_value(0),
            teams,
            units: Units::new(),
            pitch,
            ball: Ball::OffPitch,
            events: Vector::new(),
            rolls: Vector::new(),
            messages: Vector::new(),
            dice: DiceResolver::new(dice),
            reroll_armed: false,
            next_unit_id: 1,
            next_seq: 0,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current half (0 before kickoff).
    #[must_use]
    pub fn half(&self) -> u8 {
        self.half
    }

    #[must_use]
    pub fn turn(&self) -> Option<&TurnState> {
        self.turn.as_ref()
    }

    /// The team whose turn it is, during active play.
    #[must_use]
    pub fn active_team(&self) -> Option<TeamId> {
        self.turn.as_ref().map(|t| t.active)
    }

    /// Turns `team` has started in the current half.
    #[must_use]
    pub fn turn_counter(&self, team: TeamId) -> u8 {
        self.turn_counters[team]
    }

    #[must_use]
    pub fn score(&self, team: TeamId) -> u8 {
        self.score[team]
    }

    #[must_use]
    pub fn team(&self, team: TeamId) -> &Team {
        &self.teams[team]
    }

    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    #[must_use]
    pub fn units(&self) -> &Units {
        &self.units
    }

    /// Units of one team, in id order.
    pub fn team_units(&self, team: TeamId) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(move |u| u.team == team)
    }

    #[must_use]
    pub fn pitch(&self) -> &Pitch {
        &self.pitch
    }

    #[must_use]
    pub fn ball(&self) -> Ball {
        self.ball
    }

    /// Where the ball is on the pitch, if it is on the pitch.
    #[must_use]
    pub fn ball_position(&self) -> Option<Position> {
        match self.ball {
            Ball::Carried(unit) => self.unit(unit).and_then(|u| u.position),
            Ball::Loose(pos) => Some(pos),
            Ball::OffPitch => None,
        }
    }

    /// The team holding the ball.
    #[must_use]
    pub fn possession(&self) -> Option<TeamId> {
        self.ball
            .carrier()
            .and_then(|id| self.unit(id))
            .map(|u| u.team)
    }

    #[must_use]
    pub fn events(&self) -> &Vector<MatchEvent> {
        &self.events
    }

    /// Every die rolled during play, in order.
    #[must_use]
    pub fn rolls(&self) -> &Vector<RollRecord> {
        &self.rolls
    }

    #[must_use]
    pub fn messages(&self) -> &Vector<Message> {
        &self.messages
    }

    /// Enemy tackle zones on `pos` from the point of view of `team`.
    #[must_use]
    pub fn tackle_zones(&self, pos: Position, team: TeamId) -> u8 {
        self.pitch.tackle_zone_count(pos, team.opponent(), &self.units)
    }

    /// The result, once the match is Finished.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        (self.phase == Phase::Finished).then(|| GameResult::from_score(&self.score))
    }

    /// Replace the dice stream (e.g. to script the next rolls).
    pub fn set_dice(&mut self, dice: DiceStream) {
        self.dice = DiceResolver::new(dice);
    }

    // === Messages ===

    /// Append a free-form message to the match's message log.
    pub fn post_message(&mut self, author: impl Into<String>, text: impl Into<String>) -> u64 {
        let seq = self.messages.len() as u64;
        self.messages.push_back(Message {
            seq,
            author: author.into(),
            text: text.into(),
        });
        seq
    }

    // === Archive ===

    /// A compact record of the match.
    #[must_use]
    pub fn summary(&self) -> MatchSummary {
        let removed = TeamMap::new(|team| {
            self.team_units(team)
                .filter(|u| u.state.is_removed())
                .count() as u8
        });

        MatchSummary {
            id: self.id.clone(),
            phase: self.phase,
            score: self.score.clone(),
            result: self.result(),
            turns_played: self.turn_counters.clone(),
            removed,
            events: self.events.len(),
        }
    }

    /// Team, unit and dice statistics tallied from the logs.
    #[must_use]
    pub fn statistics(&self) -> MatchStats {
        MatchStats::collect(self)
    }

    /// Return to Setup, keeping rosters and treasuries.
    ///
    /// Every unit is taken off the pitch and restored to Standing, scores,
    /// counters and readiness are cleared, and the ball leaves the pitch.
    pub fn reset(&mut self) {
        let from = self.phase;

        self.pitch.clear();
        let ids: Vec<UnitId> = self.units.keys().copied().collect();
        for id in ids {
            if let Some(unit) = self.unit_mut(id) {
                unit.position = None;
                unit.state = UnitState::Standing;
                unit.stunned_this_turn = false;
            }
        }
        for (_, team) in self.teams.iter_mut() {
            team.ready = false;
        }
        self.phase = Phase::Setup;
        self.half = 0;
        self.turn = None;
        self.turn_counters = TeamMap::with_value(0);
        self.score = TeamMap::with_value(0);
        self.ball = Ball::OffPitch;
        self.reroll_armed = false;

        info!(id = %self.id, "match reset");
        self.record(EventKind::MatchReset);
        self.record(EventKind::PhaseChanged { from, to: Phase::Setup });
    }

    // === Snapshots ===

    /// Encode the full match, including the dice stream position.
    pub fn to_snapshot(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a match produced by `to_snapshot`.
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }

    // === Crate-internal mutation ===

    pub(crate) fn allocate_unit_id(&mut self) -> UnitId {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        id
    }

    pub(crate) fn team_mut(&mut self, team: TeamId) -> &mut Team {
        &mut self.teams[team]
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// Append an event to the log with the current context.
    pub(crate) fn record(&mut self, kind: EventKind) -> MatchEvent {
        let event = MatchEvent {
            seq: self.next_seq,
            half: self.half,
            turn: self
                .active_team()
                .map_or(0, |team| self.turn_counters[team]),
            team: self.active_team(),
            kind,
        };
        self.next_seq += 1;
        self.events.push_back(event.clone());
        event
    }

    /// Record every event a transcript collected, and copy its dice into
    /// the roll log. The transcript keeps its dice for the action result.
    pub(crate) fn commit(&mut self, log: &mut Transcript) -> Vec<MatchEvent> {
        let team = self.active_team();
        for outcome in &log.dice {
            self.rolls.push_back(RollRecord {
                team,
                outcome: outcome.clone(),
            });
        }
        log.events
            .drain(..)
            .collect::<Vec<_>>()
            .into_iter()
            .map(|kind| self.record(kind))
            .collect()
    }

    /// Put an off-pitch unit onto an empty cell, or move an on-pitch one.
    pub(crate) fn relocate(&mut self, id: UnitId, to: Position, log: &mut Transcript) -> bool {
        let Some(from) = self.unit(id).map(|u| u.position) else {
            return false;
        };
        if !self.pitch.in_bounds(to) || self.pitch.is_occupied(to) {
            return false;
        }
        if let Some(from) = from {
            self.pitch.vacate(from);
        }
        self.pitch.occupy(to, id);
        if let Some(unit) = self.unit_mut(id) {
            unit.position = Some(to);
        }
        if let Some(from) = from {
            log.delta(Delta::Moved { unit: id, from, to });
        }
        true
    }

    /// Take a unit off the pitch (knocked out, hurt, ejected or unplaced).
    pub(crate) fn remove_from_pitch(&mut self, id: UnitId, log: &mut Transcript) {
        let Some(from) = self.unit(id).and_then(|u| u.position) else {
            return;
        };
        self.pitch.vacate(from);
        if let Some(unit) = self.unit_mut(id) {
            unit.position = None;
        }
        log.delta(Delta::LeftPitch { unit: id, from });
    }

    pub(crate) fn set_state(&mut self, id: UnitId, to: UnitState, log: &mut Transcript) {
        let Some(unit) = self.unit_mut(id) else {
            return;
        };
        let from = unit.state;
        if from == to {
            return;
        }
        unit.state = to;
        log.delta(Delta::StateChanged { unit: id, from, to });
    }

    pub(crate) fn set_ball(&mut self, to: Ball, log: &mut Transcript) {
        let from = self.ball;
        if from == to {
            return;
        }
        self.ball = to;
        log.delta(Delta::Ball { from, to });
    }

    /// Roll a d6 test for a unit, spending a team reroll on failure when
    /// the caller armed one, the unit's team is active, holds a token and
    /// has not rerolled this turn.
    pub(crate) fn skill_test(
        &mut self,
        log: &mut Transcript,
        kind: RollKind,
        unit: UnitId,
        target: u8,
        modifiers: &[Modifier],
    ) -> DiceOutcome {
        let first = self.dice.test(kind, target, modifiers);
        log.roll(first.clone());
        if first.success {
            return first;
        }
        let Some(team) = self.reroll_available(unit) else {
            return first;
        };

        let remaining = {
            let team = self.team_mut(team);
            team.rerolls -= 1;
            team.rerolls
        };
        if let Some(turn) = self.turn.as_mut() {
            turn.reroll_used = true;
        }
        log.delta(Delta::RerollSpent { team, remaining });
        log.event(EventKind::RerollUsed { team });
        debug!(%unit, ?kind, remaining, "team reroll");

        let mut second = self.dice.test(kind, target, modifiers);
        second.reroll_used = true;
        log.roll(second.clone());
        second
    }

    fn reroll_available(&self, unit: UnitId) -> Option<TeamId> {
        if !self.reroll_armed {
            return None;
        }
        let unit = self.unit(unit)?;
        let turn = self.turn.as_ref()?;
        (unit.team == turn.active && !turn.reroll_used && self.teams[unit.team].rerolls > 0)
            .then_some(unit.team)
    }
}
