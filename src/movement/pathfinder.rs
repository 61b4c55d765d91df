//! Reachability and risk-scored path suggestions.
//!
//! ## Risk model
//!
//! Each step from `a` to `b` can require:
//!
//! - a **dodge** when `a` lies in an enemy tackle zone. Needed roll is the
//!   unit's agility target plus the enemy tackle zones on `b`, minus skill
//!   bonuses, clamped to 2..=6.
//! - a **rush** when the step goes past the unit's movement allowance. Needed
//!   roll is 2+, Sure Feet helps.
//!
//! Ending on the loose ball adds a pickup test. A path's risk is the
//! probability that at least one of its tests fails.
//!
//! ## Search
//!
//! `PathPlanner` runs a layered dynamic programme: layer `k` holds, for every
//! cell reachable in exactly `k` steps, the best way to get there (highest
//! success, then lowest exposure). The best path to a cell is then the
//! lowest-risk layer, ties going to the shorter path and then to the one
//! that spends less time in enemy tackle zones.
//!
//! Paths never enter occupied cells, never leave the pitch and only touch
//! the loose ball's cell as their last step.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{Match, TeamId, UnitId};
use crate::dice::{success_probability, Modifier};
use crate::pitch::Position;
use crate::units::{skill_modifiers, Check, Unit};

const EPSILON: f64 = 1e-12;

/// The tests a single step needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepTests {
    /// Dodge target and modifier, if a dodge is needed.
    pub dodge: Option<(u8, i8)>,
    /// Rush modifier, if the step is a rush.
    pub rush: Option<i8>,
}

impl StepTests {
    #[must_use]
    pub fn success_probability(&self) -> f64 {
        let dodge = self
            .dodge
            .map_or(1.0, |(target, modifier)| success_probability(target, modifier));
        let rush = self
            .rush
            .map_or(1.0, |modifier| success_probability(RUSH_TARGET, modifier));
        dodge * rush
    }
}

/// Rolls needed to go past the movement allowance.
pub const RUSH_TARGET: u8 = 2;

/// Work out which tests step number `index` (1-based) from `from` to `to`
/// requires of `unit`.
#[must_use]
pub fn step_tests(m: &Match, unit: &Unit, from: Position, to: Position, index: usize) -> StepTests {
    let dodge = (m.tackle_zones(from, unit.team) > 0).then(|| {
        let mut modifier = Modifier::total(&skill_modifiers(&unit.skills, Check::Dodge));
        modifier -= m.tackle_zones(to, unit.team) as i8;
        (unit.stats.agility, modifier)
    });
    let rush = (index > usize::from(unit.stats.movement))
        .then(|| Modifier::total(&skill_modifiers(&unit.skills, Check::Rush)));
    StepTests { dodge, rush }
}

/// Success chance of a pickup by `unit` standing at `at`.
fn pickup_probability(m: &Match, unit: &Unit, at: Position) -> f64 {
    let modifier = Modifier::total(&skill_modifiers(&unit.skills, Check::Pickup))
        - m.tackle_zones(at, unit.team) as i8;
    success_probability(unit.stats.agility, modifier)
}

/// A suggested path with its risk profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestedPath {
    /// Cells to walk through, excluding the start.
    pub path: Vec<Position>,
    /// Probability that at least one test on the path fails.
    pub risk: f64,
    /// Enemy tackle zones summed over every cell entered.
    pub exposure: u32,
    pub dodges: u8,
    pub rushes: u8,
}

#[derive(Clone, Copy, Debug)]
struct Node {
    success: f64,
    exposure: u32,
    prev: Position,
}

/// All best paths for one unit from its current cell.
#[derive(Clone, Debug)]
pub struct PathPlanner {
    start: Position,
    team: TeamId,
    layers: Vec<FxHashMap<Position, Node>>,
}

impl PathPlanner {
    /// Plan for `unit` with its full allowance plus rushes.
    ///
    /// Returns `None` when the unit is unknown or off the pitch.
    #[must_use]
    pub fn new(m: &Match, unit: UnitId) -> Option<Self> {
        let unit = m.unit(unit)?;
        let start = unit.position?;
        let max_steps = usize::from(unit.stats.movement) + usize::from(m.config().max_rush_squares);
        let ball = m.ball().loose_at();

        let mut layers: Vec<FxHashMap<Position, Node>> = Vec::with_capacity(max_steps + 1);
        let mut origin = FxHashMap::default();
        origin.insert(
            start,
            Node {
                success: 1.0,
                exposure: 0,
                prev: start,
            },
        );
        layers.push(origin);

        for index in 1..=max_steps {
            let mut next: FxHashMap<Position, Node> = FxHashMap::default();
            for (&from, node) in &layers[index - 1] {
                if Some(from) == ball && from != start {
                    continue;
                }
                for to in m.pitch().neighbors(from) {
                    if to == start || m.pitch().is_occupied(to) {
                        continue;
                    }
                    let mut success = node.success * step_tests(m, unit, from, to, index).success_probability();
                    if Some(to) == ball {
                        success *= pickup_probability(m, unit, to);
                    }
                    let candidate = Node {
                        success,
                        exposure: node.exposure + u32::from(m.tackle_zones(to, unit.team)),
                        prev: from,
                    };
                    let replace = match next.get(&to) {
                        None => true,
                        Some(best) => better(&candidate, best, from),
                    };
                    if replace {
                        next.insert(to, candidate);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            layers.push(next);
        }

        Some(Self {
            start,
            team: unit.team,
            layers,
        })
    }

    #[must_use]
    pub fn start(&self) -> Position {
        self.start
    }

    #[must_use]
    pub fn team(&self) -> TeamId {
        self.team
    }

    /// Every cell the unit can reach, sorted.
    #[must_use]
    pub fn reachable(&self) -> Vec<Position> {
        let mut cells: Vec<Position> = self
            .layers
            .iter()
            .skip(1)
            .flat_map(|layer| layer.keys().copied())
            .collect();
        cells.sort();
        cells.dedup();
        cells
    }

    /// Lowest-risk path to `destination`.
    #[must_use]
    pub fn best(&self, m: &Match, unit: UnitId, destination: Position) -> Option<SuggestedPath> {
        let (steps, node) = self
            .layers
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(k, layer)| layer.get(&destination).map(|n| (k, *n)))
            // Layers come shortest first, so only a strictly safer path
            // displaces a shorter one.
            .fold(None::<(usize, Node)>, |acc, (k, n)| match acc {
                Some((_, bn)) if n.success <= bn.success + EPSILON => acc,
                _ => Some((k, n)),
            })?;

        let mut path = Vec::with_capacity(steps);
        let mut cursor = destination;
        for k in (1..=steps).rev() {
            path.push(cursor);
            cursor = self.layers[k].get(&cursor)?.prev;
        }
        path.reverse();

        let unit = m.unit(unit)?;
        let mut from = self.start;
        let (mut dodges, mut rushes) = (0, 0);
        for (i, &to) in path.iter().enumerate() {
            let tests = step_tests(m, unit, from, to, i + 1);
            dodges += u8::from(tests.dodge.is_some());
            rushes += u8::from(tests.rush.is_some());
            from = to;
        }

        Some(SuggestedPath {
            path,
            risk: (1.0 - node.success).max(0.0),
            exposure: node.exposure,
            dodges,
            rushes,
        })
    }
}

/// Prefer higher success, then lower exposure, then a lower predecessor cell
/// (keeps the search independent of hash iteration order).
fn better(candidate: &Node, best: &Node, from: Position) -> bool {
    if candidate.success > best.success + EPSILON {
        return true;
    }
    if (candidate.success - best.success).abs() > EPSILON {
        return false;
    }
    match candidate.exposure.cmp(&best.exposure) {
        std::cmp::Ordering::Less => true,
        std::cmp::Ordering::Greater => false,
        std::cmp::Ordering::Equal => from < best.prev,
    }
}

/// Every cell `unit` can reach this turn, including rush squares.
#[must_use]
pub fn legal_moves(m: &Match, unit: UnitId) -> Vec<Position> {
    PathPlanner::new(m, unit).map_or_else(Vec::new, |planner| planner.reachable())
}

/// The lowest-risk path for `unit` to `destination`, if one exists.
#[must_use]
pub fn suggest_path(m: &Match, unit: UnitId, destination: Position) -> Option<SuggestedPath> {
    PathPlanner::new(m, unit)?.best(m, unit, destination)
}

/// Probability that walking `path` succeeds, or `None` if the unit is
/// unknown or off the pitch.
#[must_use]
pub fn path_success(m: &Match, unit: UnitId, path: &[Position]) -> Option<f64> {
    let unit = m.unit(unit)?;
    let mut from = unit.position?;
    let mut success = 1.0;
    for (i, &to) in path.iter().enumerate() {
        success *= step_tests(m, unit, from, to, i + 1).success_probability();
        from = to;
    }
    Some(success)
}
