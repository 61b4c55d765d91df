//! Roster & budget ledger.
//!
//! Buying units and rerolls against the team treasury, placing units on the
//! team's own half and declaring readiness. Only legal during Setup; once a
//! team is ready its roster is locked. When both teams are ready the match
//! moves to Kickoff.
//!
//! No dice are involved. Every failure is a `SetupError` and leaves the
//! match untouched.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{EventKind, Match, SetupError, TeamId, Transcript, UnitId};
use crate::pitch::Position;
use crate::rules::{change_phase, Phase};
use crate::units::{Skill, Stats, Unit};

fn check_open(m: &Match, team: TeamId) -> Result<(), SetupError> {
    if m.phase != Phase::Setup {
        return Err(SetupError::WrongPhase(m.phase));
    }
    if m.team(team).ready {
        return Err(SetupError::RosterLocked);
    }
    Ok(())
}

fn reject<T>(team: TeamId, err: SetupError) -> Result<T, SetupError> {
    warn!(%team, %err, "setup call rejected");
    Err(err)
}

/// Buy a unit of `role` for `team`.
pub fn purchase(m: &mut Match, team: TeamId, role: &str) -> Result<UnitId, SetupError> {
    if let Err(err) = check_open(m, team) {
        return reject(team, err);
    }

    let roster = m.team(team).roster;
    let Some(spec) = roster.role(role) else {
        return reject(team, SetupError::UnknownRole(role.to_string()));
    };

    let owned = m.team(team).units.len();
    let max = m.config().max_roster;
    if owned >= max {
        return reject(team, SetupError::RosterFull { max });
    }

    let of_role = m.team_units(team).filter(|u| u.role == spec.name).count();
    if of_role >= usize::from(spec.max) {
        return reject(
            team,
            SetupError::RoleQuotaExceeded {
                role: spec.name.to_string(),
                max: spec.max,
            },
        );
    }

    let remaining = m.team(team).budget;
    if !m.team_mut(team).spend(spec.cost) {
        return reject(
            team,
            SetupError::InsufficientBudget {
                needed: spec.cost,
                remaining,
            },
        );
    }

    let id = m.allocate_unit_id();
    m.units.insert(id, Unit::from_role(id, team, spec));
    m.team_mut(team).units.push(id);

    info!(%team, unit = %id, role = spec.name, cost = spec.cost, "unit purchased");
    m.record(EventKind::UnitPurchased {
        team,
        unit: id,
        role: spec.name.to_string(),
    });
    Ok(id)
}

/// Buy one team reroll token. Returns the new total.
pub fn purchase_reroll(m: &mut Match, team: TeamId) -> Result<u8, SetupError> {
    if let Err(err) = check_open(m, team) {
        return reject(team, err);
    }

    let max = m.config().max_rerolls;
    if m.team(team).rerolls >= max {
        return reject(team, SetupError::RerollLimit { max });
    }

    let cost = m.team(team).roster.reroll_cost();
    let remaining = m.team(team).budget;
    if !m.team_mut(team).spend(cost) {
        return reject(team, SetupError::InsufficientBudget { needed: cost, remaining });
    }

    let total = {
        let team = m.team_mut(team);
        team.rerolls += 1;
        team.rerolls
    };
    m.record(EventKind::RerollPurchased { team, total });
    Ok(total)
}

/// The columns `team` may set up in.
#[must_use]
pub fn own_half(m: &Match, team: TeamId) -> std::ops::Range<i32> {
    let halfway = m.config().halfway_column();
    match team {
        TeamId::HOME => 0..halfway,
        _ => halfway..m.config().pitch_width,
    }
}

/// Place (or re-place) one of `team`'s units at `position`.
pub fn place(m: &mut Match, team: TeamId, unit: UnitId, position: Position) -> Result<(), SetupError> {
    if let Err(err) = check_open(m, team) {
        return reject(team, err);
    }
    let Some(current) = m.unit(unit).map(|u| u.position) else {
        return reject(team, SetupError::UnknownUnit(unit));
    };
    if !m.team(team).owns(unit) {
        return reject(team, SetupError::NotYourUnit { unit, team });
    }
    if !m.pitch.in_bounds(position) {
        return reject(team, SetupError::OutOfBounds(position));
    }
    if !own_half(m, team).contains(&position.x) {
        return reject(team, SetupError::WrongHalf(position, team));
    }
    if current == Some(position) {
        return Ok(());
    }
    if m.pitch.is_occupied(position) {
        return reject(team, SetupError::Occupied(position));
    }

    let max = m.config().max_on_pitch;
    if current.is_none() && on_pitch(m, team) >= max {
        return reject(team, SetupError::TooManyOnPitch { max });
    }

    let mut log = Transcript::new();
    m.relocate(unit, position, &mut log);
    m.record(EventKind::UnitPlaced { unit, at: position });
    Ok(())
}

/// Take one of `team`'s units back off the pitch.
pub fn unplace(m: &mut Match, team: TeamId, unit: UnitId) -> Result<(), SetupError> {
    if let Err(err) = check_open(m, team) {
        return reject(team, err);
    }
    if m.unit(unit).is_none() {
        return reject(team, SetupError::UnknownUnit(unit));
    }
    if !m.team(team).owns(unit) {
        return reject(team, SetupError::NotYourUnit { unit, team });
    }

    let mut log = Transcript::new();
    m.remove_from_pitch(unit, &mut log);
    if !log.deltas.is_empty() {
        m.record(EventKind::UnitUnplaced { unit });
    }
    Ok(())
}

fn on_pitch(m: &Match, team: TeamId) -> usize {
    m.team_units(team).filter(|u| u.is_on_pitch()).count()
}

/// Declare `team` ready. Returns the phase afterwards (Kickoff once both
/// teams are ready).
pub fn mark_ready(m: &mut Match, team: TeamId) -> Result<Phase, SetupError> {
    if m.phase != Phase::Setup {
        return reject(team, SetupError::WrongPhase(m.phase));
    }
    if m.team(team).ready {
        return reject(team, SetupError::AlreadyReady(team));
    }

    let have = m.team(team).units.len();
    let need = m.config().min_roster;
    if have < need {
        return reject(team, SetupError::RosterTooSmall { have, need });
    }
    if on_pitch(m, team) == 0 {
        return reject(team, SetupError::NoUnitsPlaced);
    }

    m.team_mut(team).ready = true;
    info!(%team, "team ready");
    m.record(EventKind::TeamReady { team });

    if TeamId::both().all(|t| m.team(t).ready) {
        change_phase(m, Phase::Kickoff);
    }
    Ok(m.phase)
}

/// One line of a team's spending.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Purchase {
    Unit { unit: UnitId, role: String, cost: u32 },
    Reroll { cost: u32 },
}

impl Purchase {
    #[must_use]
    pub fn cost(&self) -> u32 {
        match self {
            Purchase::Unit { cost, .. } | Purchase::Reroll { cost } => *cost,
        }
    }
}

/// Where a team's treasury stands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub initial: u32,
    pub spent: u32,
    pub remaining: u32,
    /// In purchase order.
    pub purchases: Vec<Purchase>,
}

/// Spending so far for `team`, rebuilt from the purchase events.
#[must_use]
pub fn budget_status(m: &Match, team: TeamId) -> BudgetStatus {
    let roster = m.team(team).roster;
    let purchases: Vec<Purchase> = m
        .events()
        .iter()
        .filter_map(|e| match &e.kind {
            EventKind::UnitPurchased { team: t, unit, role } if *t == team => Some(Purchase::Unit {
                unit: *unit,
                role: role.clone(),
                cost: roster.role(role).map_or(0, |r| r.cost),
            }),
            EventKind::RerollPurchased { team: t, .. } if *t == team => Some(Purchase::Reroll {
                cost: roster.reroll_cost(),
            }),
            _ => None,
        })
        .collect();

    BudgetStatus {
        initial: m.config().starting_budget,
        spent: purchases.iter().map(Purchase::cost).sum(),
        remaining: m.team(team).budget,
        purchases,
    }
}

/// A role on the team's roster, with what the team may still do with it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableRole {
    pub name: String,
    pub cost: u32,
    pub max: u8,
    pub owned: u8,
    /// Affordable and under the role's quota.
    pub affordable: bool,
    pub stats: Stats,
    pub skills: Vec<Skill>,
}

/// Every role `team` could buy, in roster order.
#[must_use]
pub fn available_roles(m: &Match, team: TeamId) -> Vec<AvailableRole> {
    let budget = m.team(team).budget;
    m.team(team)
        .roster
        .roles()
        .iter()
        .map(|spec| {
            let owned = m.team_units(team).filter(|u| u.role == spec.name).count();
            let owned = u8::try_from(owned).unwrap_or(u8::MAX);
            AvailableRole {
                name: spec.name.to_string(),
                cost: spec.cost,
                max: spec.max,
                owned,
                affordable: spec.cost <= budget && owned < spec.max,
                stats: spec.stats,
                skills: spec.skills.to_vec(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DiceStream, MatchConfig, TeamMap};
    use crate::units::RosterKind;

    fn new_match() -> Match {
        Match::new(
            "ledger",
            MatchConfig::default(),
            TeamMap::new(|t| if t == TeamId::HOME { RosterKind::Watch } else { RosterKind::Academy }),
            DiceStream::seeded(1),
        )
    }

    #[test]
    fn test_purchase_spends_budget() {
        let mut m = new_match();
        let id = purchase(&mut m, TeamId::HOME, "Thrower").unwrap();

        assert_eq!(m.team(TeamId::HOME).budget, 1_000_000 - 80_000);
        assert_eq!(m.unit(id).unwrap().role, "Thrower");
        assert!(m.team(TeamId::HOME).owns(id));
    }

    #[test]
    fn test_unknown_role() {
        let mut m = new_match();
        let err = purchase(&mut m, TeamId::HOME, "Gargoyle").unwrap_err();
        assert_eq!(err, SetupError::UnknownRole("Gargoyle".to_string()));
    }

    #[test]
    fn test_role_quota() {
        let mut m = new_match();
        purchase(&mut m, TeamId::AWAY, "Gargoyle").unwrap();
        let err = purchase(&mut m, TeamId::AWAY, "Gargoyle").unwrap_err();
        assert!(matches!(err, SetupError::RoleQuotaExceeded { max: 1, .. }));
    }

    #[test]
    fn test_insufficient_budget_leaves_team_untouched() {
        let mut m = Match::new(
            "poor",
            MatchConfig::default().with_budget(100_000),
            TeamMap::with_value(RosterKind::Watch),
            DiceStream::seeded(1),
        );
        purchase(&mut m, TeamId::HOME, "Thrower").unwrap();
        let err = purchase(&mut m, TeamId::HOME, "Blitzer").unwrap_err();

        assert_eq!(
            err,
            SetupError::InsufficientBudget {
                needed: 85_000,
                remaining: 20_000
            }
        );
        assert_eq!(m.team(TeamId::HOME).units.len(), 1);
        assert_eq!(m.team(TeamId::HOME).budget, 20_000);
    }

    #[test]
    fn test_reroll_purchase() {
        let mut m = new_match();
        assert_eq!(purchase_reroll(&mut m, TeamId::AWAY).unwrap(), 1);
        assert_eq!(m.team(TeamId::AWAY).budget, 1_000_000 - 60_000);
    }

    #[test]
    fn test_place_respects_halves() {
        let mut m = new_match();
        let home = purchase(&mut m, TeamId::HOME, "Lineman").unwrap();
        let away = purchase(&mut m, TeamId::AWAY, "Apprentice").unwrap();

        assert!(place(&mut m, TeamId::HOME, home, Position::new(12, 7)).is_ok());
        assert_eq!(
            place(&mut m, TeamId::AWAY, away, Position::new(12, 8)),
            Err(SetupError::WrongHalf(Position::new(12, 8), TeamId::AWAY))
        );
        assert!(place(&mut m, TeamId::AWAY, away, Position::new(13, 7)).is_ok());
    }

    #[test]
    fn test_place_rejects_occupied_and_foreign_units() {
        let mut m = new_match();
        let a = purchase(&mut m, TeamId::HOME, "Lineman").unwrap();
        let b = purchase(&mut m, TeamId::HOME, "Lineman").unwrap();
        let away = purchase(&mut m, TeamId::AWAY, "Apprentice").unwrap();

        place(&mut m, TeamId::HOME, a, Position::new(5, 5)).unwrap();
        assert_eq!(
            place(&mut m, TeamId::HOME, b, Position::new(5, 5)),
            Err(SetupError::Occupied(Position::new(5, 5)))
        );
        assert_eq!(
            place(&mut m, TeamId::HOME, away, Position::new(6, 5)),
            Err(SetupError::NotYourUnit {
                unit: away,
                team: TeamId::HOME
            })
        );
    }

    #[test]
    fn test_replace_and_unplace() {
        let mut m = new_match();
        let a = purchase(&mut m, TeamId::HOME, "Lineman").unwrap();

        place(&mut m, TeamId::HOME, a, Position::new(5, 5)).unwrap();
        place(&mut m, TeamId::HOME, a, Position::new(6, 6)).unwrap();
        assert!(!m.pitch().is_occupied(Position::new(5, 5)));
        assert_eq!(m.pitch().unit_at(Position::new(6, 6)), Some(a));

        unplace(&mut m, TeamId::HOME, a).unwrap();
        assert_eq!(m.unit(a).unwrap().position, None);
        assert_eq!(m.pitch().occupied_count(), 0);
    }

    #[test]
    fn test_ready_requires_roster_and_placement() {
        let mut m = new_match();
        let ids: Vec<_> = (0..3)
            .map(|_| purchase(&mut m, TeamId::HOME, "Lineman").unwrap())
            .collect();

        assert_eq!(mark_ready(&mut m, TeamId::HOME), Err(SetupError::NoUnitsPlaced));
        place(&mut m, TeamId::HOME, ids[0], Position::new(10, 7)).unwrap();
        assert_eq!(mark_ready(&mut m, TeamId::HOME), Ok(Phase::Setup));

        assert_eq!(
            purchase(&mut m, TeamId::HOME, "Lineman"),
            Err(SetupError::RosterLocked)
        );
        assert_eq!(
            mark_ready(&mut m, TeamId::AWAY),
            Err(SetupError::RosterTooSmall { have: 0, need: 3 })
        );
    }

    #[test]
    fn test_budget_status_lists_purchases() {
        let mut m = new_match();
        let thrower = purchase(&mut m, TeamId::HOME, "Thrower").unwrap();
        purchase_reroll(&mut m, TeamId::HOME).unwrap();
        purchase(&mut m, TeamId::AWAY, "Senior").unwrap();

        let status = budget_status(&m, TeamId::HOME);
        assert_eq!(status.initial, 1_000_000);
        assert_eq!(status.spent, 130_000);
        assert_eq!(status.remaining, 870_000);
        assert_eq!(
            status.purchases,
            vec![
                Purchase::Unit {
                    unit: thrower,
                    role: "Thrower".to_string(),
                    cost: 80_000
                },
                Purchase::Reroll { cost: 50_000 },
            ]
        );
        assert_eq!(budget_status(&m, TeamId::AWAY).spent, 90_000);
    }

    #[test]
    fn test_available_roles_track_quota_and_budget() {
        let mut m = Match::new(
            "roles",
            MatchConfig::default().with_budget(200_000),
            TeamMap::with_value(RosterKind::Academy),
            DiceStream::seeded(1),
        );
        purchase(&mut m, TeamId::AWAY, "Gargoyle").unwrap();

        let roles = available_roles(&m, TeamId::AWAY);
        let names: Vec<_> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Apprentice", "Senior", "Gargoyle"]);

        let gargoyle = &roles[2];
        assert_eq!((gargoyle.owned, gargoyle.max), (1, 1));
        assert!(!gargoyle.affordable);

        // 85_000 left: an Apprentice fits, a Senior does not
        assert!(roles[0].affordable);
        assert!(!roles[1].affordable);
        assert!(available_roles(&m, TeamId::HOME).iter().all(|r| r.owned == 0));
    }
}
