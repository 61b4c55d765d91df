//! Enumerating legal requests.
//!
//! Each shape produced here passes `validate`. Movement is offered as one
//! `Move` per reachable cell along the lowest-risk path; charges as one per
//! standing opponent, via the safest free cell next to it; throws as one per
//! standing teammate in range.

use serde::{Deserialize, Serialize};

use super::turn::Phase;
use super::validate::validate;
use crate::ball::PassRange;
use crate::core::{ActionRequest, Match, TeamId, UnitId};
use crate::movement::PathPlanner;
use crate::pitch::Position;
use crate::units::{Unit, UnitState};

/// Whose actions to list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionScope {
    Unit(UnitId),
    Team(TeamId),
}

/// Every legal request for the scope, grouped by unit in id order.
#[must_use]
pub fn legal_actions(m: &Match, scope: ActionScope) -> Vec<ActionRequest> {
    if m.phase() != Phase::ActivePlay {
        return Vec::new();
    }
    let units: Vec<UnitId> = match scope {
        ActionScope::Unit(id) => vec![id],
        ActionScope::Team(team) => m.team_units(team).map(|u| u.id).collect(),
    };

    units
        .into_iter()
        .filter_map(|id| m.unit(id))
        .flat_map(|unit| candidates(m, unit))
        .filter(|request| validate(m, request).is_ok())
        .collect()
}

fn candidates(m: &Match, unit: &Unit) -> Vec<ActionRequest> {
    let id = unit.id;
    let Some(pos) = unit.position else {
        return Vec::new();
    };
    if unit.state == UnitState::Prone {
        return vec![ActionRequest::StandUp { unit: id }];
    }
    if !unit.is_standing() {
        return Vec::new();
    }

    let mut out = Vec::new();
    let planner = PathPlanner::new(m, id);

    if let Some(planner) = &planner {
        for cell in planner.reachable() {
            if let Some(best) = planner.best(m, id, cell) {
                out.push(ActionRequest::Move {
                    unit: id,
                    path: best.path,
                });
            }
        }
    }

    let opponents: Vec<&Unit> = m
        .team_units(unit.team.opponent())
        .filter(|u| u.is_on_pitch())
        .collect();

    for other in &opponents {
        let Some(at) = other.position else { continue };
        match other.state {
            UnitState::Standing if pos.is_adjacent(at) => {
                out.push(ActionRequest::Engage {
                    unit: id,
                    target: other.id,
                });
                out.push(ActionRequest::Charge {
                    unit: id,
                    path: Vec::new(),
                    target: other.id,
                });
            }
            UnitState::Standing => {
                if let Some(path) = planner.as_ref().and_then(|p| charge_path(m, p, id, at)) {
                    out.push(ActionRequest::Charge {
                        unit: id,
                        path,
                        target: other.id,
                    });
                }
            }
            UnitState::Prone if pos.is_adjacent(at) => out.push(ActionRequest::Boot {
                unit: id,
                target: other.id,
            }),
            _ => {}
        }
    }

    if m.ball().carrier() == Some(id) {
        for mate in m.team_units(unit.team) {
            let Some(at) = mate.position else { continue };
            if mate.id == id || !mate.is_standing() {
                continue;
            }
            if pos.is_adjacent(at) {
                out.push(ActionRequest::QuickPass {
                    unit: id,
                    receiver: mate.id,
                });
            }
            if PassRange::from_distance(pos.distance(at)).is_some() {
                out.push(ActionRequest::Throw { unit: id, target: at });
            }
        }
    }

    out
}

/// Safest path to a free cell next to `target`, avoiding the loose ball.
fn charge_path(m: &Match, planner: &PathPlanner, id: UnitId, target: Position) -> Option<Vec<Position>> {
    let ball = m.ball().loose_at();
    m.pitch()
        .neighbors(target)
        .into_iter()
        .filter(|cell| Some(*cell) != ball)
        .filter_map(|cell| planner.best(m, id, cell))
        .filter(|best| !best.path.iter().any(|c| Some(*c) == ball))
        .min_by(|a, b| {
            a.risk
                .total_cmp(&b.risk)
                .then(a.path.len().cmp(&b.path.len()))
                .then(a.exposure.cmp(&b.exposure))
        })
        .map(|best| best.path)
}
