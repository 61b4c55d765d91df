//! Tallying the event and roll logs.
//!
//! ## Attribution
//!
//! Events name the unit they happened to, not always who caused it. A
//! knockdown or casualty is credited to the unit that last engaged or booted
//! during the current action, when that unit is on the other team. Armor
//! breaks and casualties always count for the victim's opponent at team
//! level. A throw counts as completed when a teammate of the thrower catches
//! the ball before the action ends.

use im::OrdMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::ball::PassAccuracy;
use crate::core::{EventKind, Match, MatchEvent, RollRecord, TeamId, TeamMap, TurnoverReason, UnitId};
use crate::dice::RollKind;
use crate::units::UnitState;

/// Per-team totals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    // === Offence ===
    pub touchdowns: u32,
    pub passes_attempted: u32,
    pub passes_completed: u32,
    pub fumbles: u32,
    pub pickups_attempted: u32,
    pub pickups_succeeded: u32,
    pub hand_offs: u32,

    // === Contact ===
    pub engagements: u32,
    pub boots: u32,
    pub knockdowns_inflicted: u32,
    pub armor_breaks_inflicted: u32,
    pub casualties_inflicted: u32,

    // === Against ===
    pub failed_dodges: u32,
    pub failed_rushes: u32,
    pub units_knocked_out: u32,
    pub casualties_suffered: u32,
    pub ejections: u32,
    pub turnovers: u32,
    pub rerolls_used: u32,
}

/// Per-unit totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStats {
    pub team: TeamId,
    pub role: String,
    pub squares_moved: u32,
    pub failed_dodges: u32,
    pub failed_rushes: u32,
    pub engagements: u32,
    pub boots: u32,
    pub passes_attempted: u32,
    pub passes_completed: u32,
    pub catches_attempted: u32,
    pub catches_made: u32,
    pub pickups_attempted: u32,
    pub pickups_succeeded: u32,
    pub knockdowns_inflicted: u32,
    pub casualties_inflicted: u32,
    pub times_knocked_down: u32,
    /// Armor breaks suffered.
    pub times_injured: u32,
    pub touchdowns: u32,
}

impl UnitStats {
    fn new(team: TeamId, role: &str) -> Self {
        Self {
            team,
            role: role.to_string(),
            squares_moved: 0,
            failed_dodges: 0,
            failed_rushes: 0,
            engagements: 0,
            boots: 0,
            passes_attempted: 0,
            passes_completed: 0,
            catches_attempted: 0,
            catches_made: 0,
            pickups_attempted: 0,
            pickups_succeeded: 0,
            knockdowns_inflicted: 0,
            casualties_inflicted: 0,
            times_knocked_down: 0,
            times_injured: 0,
            touchdowns: 0,
        }
    }
}

/// Rolls of one kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceTally {
    pub rolled: u32,
    pub succeeded: u32,
}

impl DiceTally {
    #[must_use]
    pub fn failed(&self) -> u32 {
        self.rolled - self.succeeded
    }

    /// Fraction of successful rolls, 0.0 when nothing was rolled.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.rolled == 0 {
            0.0
        } else {
            f64::from(self.succeeded) / f64::from(self.rolled)
        }
    }
}

/// Everything tallied for one match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub teams: TeamMap<TeamStats>,
    /// One line for every unit the match knows, on the pitch or not.
    pub units: OrdMap<UnitId, UnitStats>,
    pub dice: FxHashMap<RollKind, DiceTally>,
    pub turnovers: FxHashMap<TurnoverReason, u32>,
    pub total_rolls: u32,
}

impl MatchStats {
    /// Tally the match's event and roll logs.
    #[must_use]
    pub fn collect(m: &Match) -> Self {
        let mut tally = Tally::new(m);
        for event in m.events() {
            tally.event(event);
        }
        for roll in m.rolls() {
            tally.roll(roll);
        }
        tally.stats
    }

    #[must_use]
    pub fn team(&self, team: TeamId) -> &TeamStats {
        &self.teams[team]
    }

    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&UnitStats> {
        self.units.get(&id)
    }

    /// Rolls of `kind`, zero if none were made.
    #[must_use]
    pub fn dice(&self, kind: RollKind) -> DiceTally {
        self.dice.get(&kind).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn turnovers(&self, reason: TurnoverReason) -> u32 {
        self.turnovers.get(&reason).copied().unwrap_or(0)
    }
}

struct Tally<'a> {
    m: &'a Match,
    stats: MatchStats,
    /// Last unit to engage or boot in the current action.
    aggressor: Option<UnitId>,
    /// Thrower whose ball is still in the air this action.
    thrower: Option<UnitId>,
}

impl<'a> Tally<'a> {
    fn new(m: &'a Match) -> Self {
        let units = m
            .units()
            .values()
            .map(|u| (u.id, UnitStats::new(u.team, &u.role)))
            .collect();
        Self {
            m,
            stats: MatchStats {
                teams: TeamMap::new(|_| TeamStats::default()),
                units,
                dice: FxHashMap::default(),
                turnovers: FxHashMap::default(),
                total_rolls: 0,
            },
            aggressor: None,
            thrower: None,
        }
    }

    fn team_of(&self, id: UnitId) -> Option<TeamId> {
        self.m.unit(id).map(|u| u.team)
    }

    fn unit(&mut self, id: UnitId, f: impl FnOnce(&mut UnitStats)) {
        if let Some(stats) = self.stats.units.get_mut(&id) {
            f(stats);
        }
    }

    fn team_of_unit(&mut self, id: UnitId, f: impl FnOnce(&mut TeamStats)) {
        if let Some(team) = self.team_of(id) {
            f(&mut self.stats.teams[team]);
        }
    }

    /// The aggressor, if it plays against `victim`.
    fn opposing_aggressor(&self, victim: UnitId) -> Option<UnitId> {
        let aggressor = self.aggressor?;
        let victim_team = self.team_of(victim)?;
        (self.team_of(aggressor)? != victim_team).then_some(aggressor)
    }

    fn new_action(&mut self) {
        self.aggressor = None;
        self.thrower = None;
    }

    fn event(&mut self, event: &MatchEvent) {
        match event.kind {
            EventKind::TurnStarted { .. } | EventKind::TurnEnded { .. } | EventKind::UnitStoodUp { .. } => {
                self.new_action();
            }
            EventKind::UnitMoved { unit, .. } => {
                self.new_action();
                self.unit(unit, |s| s.squares_moved += 1);
            }
            EventKind::DodgeFailed { unit } => {
                self.unit(unit, |s| s.failed_dodges += 1);
                self.team_of_unit(unit, |t| t.failed_dodges += 1);
            }
            EventKind::RushFailed { unit } => {
                self.unit(unit, |s| s.failed_rushes += 1);
                self.team_of_unit(unit, |t| t.failed_rushes += 1);
            }
            EventKind::Engagement { attacker, .. } => {
                self.aggressor = Some(attacker);
                self.unit(attacker, |s| s.engagements += 1);
                self.team_of_unit(attacker, |t| t.engagements += 1);
            }
            EventKind::Booted { unit, .. } => {
                self.aggressor = Some(unit);
                self.unit(unit, |s| s.boots += 1);
                self.team_of_unit(unit, |t| t.boots += 1);
            }
            EventKind::UnitKnockedDown { unit } => {
                self.unit(unit, |s| s.times_knocked_down += 1);
                if let Some(aggressor) = self.opposing_aggressor(unit) {
                    self.unit(aggressor, |s| s.knockdowns_inflicted += 1);
                    self.team_of_unit(aggressor, |t| t.knockdowns_inflicted += 1);
                }
            }
            EventKind::ArmorBroken { unit } => {
                self.unit(unit, |s| s.times_injured += 1);
                if let Some(team) = self.team_of(unit) {
                    self.stats.teams[team.opponent()].armor_breaks_inflicted += 1;
                }
            }
            EventKind::Injured { unit, state } => self.injury(unit, state),
            EventKind::Ejected { unit } => {
                self.team_of_unit(unit, |t| t.ejections += 1);
            }
            EventKind::BallPickedUp { unit } => {
                self.unit(unit, |s| {
                    s.pickups_attempted += 1;
                    s.pickups_succeeded += 1;
                });
                self.team_of_unit(unit, |t| {
                    t.pickups_attempted += 1;
                    t.pickups_succeeded += 1;
                });
            }
            EventKind::PickupFailed { unit } => {
                self.unit(unit, |s| s.pickups_attempted += 1);
                self.team_of_unit(unit, |t| t.pickups_attempted += 1);
            }
            EventKind::BallThrown { unit, accuracy, .. } => {
                self.thrower = Some(unit);
                self.unit(unit, |s| s.passes_attempted += 1);
                self.team_of_unit(unit, |t| {
                    t.passes_attempted += 1;
                    if accuracy == PassAccuracy::Fumble {
                        t.fumbles += 1;
                    }
                });
            }
            EventKind::BallCaught { unit } => {
                self.unit(unit, |s| {
                    s.catches_attempted += 1;
                    s.catches_made += 1;
                });
                if let Some(thrower) = self.thrower {
                    if self.team_of(thrower) == self.team_of(unit) {
                        self.thrower = None;
                        self.unit(thrower, |s| s.passes_completed += 1);
                        self.team_of_unit(thrower, |t| t.passes_completed += 1);
                    }
                }
            }
            EventKind::CatchFailed { unit } => {
                self.unit(unit, |s| s.catches_attempted += 1);
            }
            EventKind::HandedOff { from, .. } => {
                self.team_of_unit(from, |t| t.hand_offs += 1);
            }
            EventKind::Touchdown { team, unit } => {
                self.unit(unit, |s| s.touchdowns += 1);
                self.stats.teams[team].touchdowns += 1;
            }
            EventKind::Turnover { team, reason } => {
                self.stats.teams[team].turnovers += 1;
                *self.stats.turnovers.entry(reason).or_insert(0) += 1;
            }
            EventKind::RerollUsed { team } => {
                self.stats.teams[team].rerolls_used += 1;
            }
            _ => {}
        }
    }

    fn injury(&mut self, unit: UnitId, state: UnitState) {
        match state {
            UnitState::KnockedOut => self.team_of_unit(unit, |t| t.units_knocked_out += 1),
            UnitState::Casualty => {
                self.team_of_unit(unit, |t| t.casualties_suffered += 1);
                if let Some(team) = self.team_of(unit) {
                    self.stats.teams[team.opponent()].casualties_inflicted += 1;
                }
                if let Some(aggressor) = self.opposing_aggressor(unit) {
                    self.unit(aggressor, |s| s.casualties_inflicted += 1);
                }
            }
            _ => {}
        }
    }

    fn roll(&mut self, record: &RollRecord) {
        self.stats.total_rolls += 1;
        let tally = self.stats.dice.entry(record.outcome.kind).or_default();
        tally.rolled += 1;
        if record.outcome.success {
            tally.succeeded += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ActionRequest;
    use crate::pitch::Position;
    use crate::rules::execute;
    use crate::scenario::ScenarioBuilder;

    #[test]
    fn test_dice_tally_rates() {
        let tally = DiceTally { rolled: 4, succeeded: 3 };
        assert_eq!(tally.failed(), 1);
        assert!((tally.success_rate() - 0.75).abs() < 1e-9);
        assert_eq!(DiceTally::default().success_rate(), 0.0);
    }

    #[test]
    fn test_every_unit_has_a_line() {
        let m = ScenarioBuilder::new("lines")
            .unit(TeamId::HOME, "Thrower", Position::new(5, 7))
            .unit(TeamId::AWAY, "Gargoyle", Position::new(20, 7))
            .build()
            .unwrap();

        let stats = m.statistics();
        assert_eq!(stats.units.len(), 2);
        assert_eq!(stats.unit(UnitId(2)).unwrap().role, "Gargoyle");
        assert_eq!(stats.unit(UnitId(2)).unwrap().team, TeamId::AWAY);
        assert_eq!(stats.total_rolls, 0);
    }

    #[test]
    fn test_completed_pass_and_dice() {
        let mut m = ScenarioBuilder::new("pass")
            .unit(TeamId::HOME, "Thrower", Position::new(5, 7))
            .unit(TeamId::HOME, "Catcher", Position::new(9, 7))
            .unit(TeamId::AWAY, "Apprentice", Position::new(20, 3))
            .ball_carried(UnitId(1))
            .dice([4, 3])
            .build()
            .unwrap();
        execute(
            &mut m,
            &ActionRequest::Throw {
                unit: UnitId(1),
                target: Position::new(9, 7),
            },
        )
        .unwrap();

        let stats = m.statistics();
        let home = stats.team(TeamId::HOME);
        assert_eq!(home.passes_attempted, 1);
        assert_eq!(home.passes_completed, 1);
        assert_eq!(stats.unit(UnitId(1)).unwrap().passes_completed, 1);
        assert_eq!(stats.unit(UnitId(2)).unwrap().catches_made, 1);

        assert_eq!(stats.total_rolls, 2);
        assert_eq!(stats.dice(RollKind::Throw), DiceTally { rolled: 1, succeeded: 1 });
        assert_eq!(stats.dice(RollKind::Catch), DiceTally { rolled: 1, succeeded: 1 });
        assert_eq!(stats.dice(RollKind::Dodge), DiceTally::default());
    }
}
