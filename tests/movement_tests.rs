//! Movement integration tests.
//!
//! These tests verify walking, dodging, rushing, standing up and the
//! pathfinder against scripted dice.

use gridball::core::{ActionError, ActionRequest, IllegalAction, Outcome, TurnoverReason};
use gridball::movement::suggest_path;
use gridball::rules::{execute, execute_with_reroll, RulesEngine, StandardRules};
use gridball::scenario::ScenarioBuilder;
use gridball::units::{Stats, UnitState};
use gridball::{Match, Position, TeamId, UnitId};

fn pos(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

fn unit_at(m: &Match, id: u32) -> Option<Position> {
    m.unit(UnitId(id)).and_then(|u| u.position)
}

// =============================================================================
// Walking
// =============================================================================

/// A free walk with no enemy tackle zones draws no dice.
#[test]
fn test_free_walk_draws_no_dice() {
    let mut m = ScenarioBuilder::new("walk")
        .unit(TeamId::HOME, "Lineman", pos(5, 7))
        .unit(TeamId::AWAY, "Apprentice", pos(20, 3))
        .dice([])
        .build()
        .unwrap();

    let result = execute(
        &mut m,
        &ActionRequest::Move {
            unit: UnitId(1),
            path: vec![pos(6, 7), pos(7, 7)],
        },
    )
    .unwrap();

    assert_eq!(result.outcome, Outcome::Success);
    assert!(result.dice.is_empty());
    assert_eq!(unit_at(&m, 1), Some(pos(7, 7)));
    assert!(!m.pitch().is_occupied(pos(5, 7)));
    assert_eq!(m.active_team(), Some(TeamId::HOME));
}

/// A unit that has moved cannot move again this turn.
#[test]
fn test_one_move_per_unit() {
    let mut m = ScenarioBuilder::new("twice")
        .unit(TeamId::HOME, "Lineman", pos(5, 7))
        .build()
        .unwrap();

    execute(
        &mut m,
        &ActionRequest::Move {
            unit: UnitId(1),
            path: vec![pos(6, 7)],
        },
    )
    .unwrap();
    let err = execute(
        &mut m,
        &ActionRequest::Move {
            unit: UnitId(1),
            path: vec![pos(7, 7)],
        },
    )
    .unwrap_err();

    assert_eq!(err, ActionError::Illegal(IllegalAction::AlreadyMoved(UnitId(1))));
    assert_eq!(unit_at(&m, 1), Some(pos(6, 7)));
}

/// Leaving an enemy tackle zone needs a dodge; failing it knocks the unit
/// down in the cell it stepped into and hands the turn over.
#[test]
fn test_failed_dodge_is_turnover() {
    let mut m = ScenarioBuilder::new("dodge")
        .unit(TeamId::HOME, "Lineman", pos(5, 7))
        .unit(TeamId::HOME, "Lineman", pos(2, 2))
        .unit(TeamId::AWAY, "Apprentice", pos(6, 7))
        // dodge 2 vs 3+, armor 1+1
        .dice([2, 1, 1])
        .build()
        .unwrap();

    let result = execute(
        &mut m,
        &ActionRequest::Move {
            unit: UnitId(1),
            path: vec![pos(4, 7), pos(3, 7)],
        },
    )
    .unwrap();

    assert_eq!(result.outcome, Outcome::Turnover(TurnoverReason::FailedDodge));
    assert_eq!(result.dice.len(), 2);
    assert_eq!(unit_at(&m, 1), Some(pos(4, 7)));
    assert_eq!(m.unit(UnitId(1)).unwrap().state, UnitState::Prone);
    assert_eq!(m.active_team(), Some(TeamId::AWAY));

    // No further actions that team-turn.
    let err = execute(
        &mut m,
        &ActionRequest::Move {
            unit: UnitId(2),
            path: vec![pos(3, 2)],
        },
    )
    .unwrap_err();
    assert_eq!(err, ActionError::Illegal(IllegalAction::NotYourTurn(TeamId::HOME)));
}

/// Going past the movement allowance needs a rush on 2+; a 1 fails.
#[test]
fn test_failed_rush_is_turnover() {
    let mut m = ScenarioBuilder::new("rush")
        .unit(TeamId::HOME, "Lineman", pos(2, 2))
        .unit(TeamId::AWAY, "Apprentice", pos(20, 10))
        .dice([1, 1, 1])
        .build()
        .unwrap();

    let path: Vec<Position> = (3..=9).map(|x| pos(x, 2)).collect();
    let result = execute(&mut m, &ActionRequest::Move { unit: UnitId(1), path }).unwrap();

    assert_eq!(result.outcome, Outcome::Turnover(TurnoverReason::FailedRush));
    assert_eq!(unit_at(&m, 1), Some(pos(9, 2)));
    assert_eq!(m.unit(UnitId(1)).unwrap().state, UnitState::Prone);
    assert_eq!(m.active_team(), Some(TeamId::AWAY));
}

/// Paths longer than allowance plus rushes are rejected before any die.
#[test]
fn test_path_too_long() {
    let mut m = ScenarioBuilder::new("long")
        .unit(TeamId::HOME, "Lineman", pos(2, 2))
        .build()
        .unwrap();

    let path: Vec<Position> = (3..=11).map(|x| pos(x, 2)).collect();
    let events = m.events().len();
    let err = execute(&mut m, &ActionRequest::Move { unit: UnitId(1), path }).unwrap_err();

    assert_eq!(err, ActionError::Illegal(IllegalAction::PathTooLong { len: 9, max: 8 }));
    assert_eq!(m.events().len(), events);
    assert_eq!(unit_at(&m, 1), Some(pos(2, 2)));
}

/// Occupied and non-contiguous cells are rejected.
#[test]
fn test_path_shape_rejections() {
    let mut m = ScenarioBuilder::new("shape")
        .unit(TeamId::HOME, "Lineman", pos(5, 5))
        .unit(TeamId::HOME, "Lineman", pos(6, 5))
        .build()
        .unwrap();

    let blocked = execute(
        &mut m,
        &ActionRequest::Move {
            unit: UnitId(1),
            path: vec![pos(6, 5)],
        },
    );
    assert_eq!(
        blocked.unwrap_err(),
        ActionError::Illegal(IllegalAction::PathBlocked(pos(6, 5)))
    );

    let gap = execute(
        &mut m,
        &ActionRequest::Move {
            unit: UnitId(1),
            path: vec![pos(5, 6), pos(5, 8)],
        },
    );
    assert_eq!(
        gap.unwrap_err(),
        ActionError::Illegal(IllegalAction::PathNotContiguous(pos(5, 8)))
    );

    let off = execute(
        &mut m,
        &ActionRequest::Move {
            unit: UnitId(2),
            path: vec![pos(6, 4), pos(6, 3), pos(6, 2), pos(6, 1), pos(6, 0), pos(6, -1)],
        },
    );
    assert_eq!(
        off.unwrap_err(),
        ActionError::Illegal(IllegalAction::PathOutOfBounds(pos(6, -1)))
    );
}

// =============================================================================
// Team Rerolls
// =============================================================================

/// A team reroll replaces the first failed test, once per team-turn.
#[test]
fn test_reroll_once_per_turn() {
    let mut m = ScenarioBuilder::new("reroll")
        .unit(TeamId::HOME, "Lineman", pos(5, 7))
        .unit(TeamId::AWAY, "Apprentice", pos(6, 7))
        .unit(TeamId::HOME, "Lineman", pos(5, 11))
        .unit(TeamId::AWAY, "Apprentice", pos(6, 11))
        .rerolls(TeamId::HOME, 2)
        // first dodge fails then rerolls to 5; second dodge fails, armor 1+1
        .dice([2, 5, 2, 1, 1])
        .build()
        .unwrap();

    let first = execute_with_reroll(
        &mut m,
        &ActionRequest::Move {
            unit: UnitId(1),
            path: vec![pos(4, 7)],
        },
    )
    .unwrap();
    assert_eq!(first.outcome, Outcome::Success);
    assert_eq!(first.dice.len(), 2);
    assert!(first.dice[1].reroll_used);
    assert_eq!(m.team(TeamId::HOME).rerolls, 1);
    assert!(m.turn().unwrap().reroll_used);

    let second = execute_with_reroll(
        &mut m,
        &ActionRequest::Move {
            unit: UnitId(3),
            path: vec![pos(4, 11)],
        },
    )
    .unwrap();
    assert_eq!(second.outcome, Outcome::Turnover(TurnoverReason::FailedDodge));
    assert_eq!(m.team(TeamId::HOME).rerolls, 1);
}

/// The engine passes rerolls through rather than running a plain execute.
#[test]
fn test_engine_reroll_spends_token() {
    let mut m = ScenarioBuilder::new("engine-reroll")
        .unit(TeamId::HOME, "Lineman", pos(5, 7))
        .unit(TeamId::AWAY, "Apprentice", pos(6, 7))
        .rerolls(TeamId::HOME, 1)
        // dodge fails, reroll 5
        .dice([2, 5])
        .build()
        .unwrap();

    let result = StandardRules
        .execute_with_reroll(
            &mut m,
            &ActionRequest::Move {
                unit: UnitId(1),
                path: vec![pos(4, 7)],
            },
        )
        .unwrap();

    assert_eq!(result.outcome, Outcome::Success);
    assert!(result.dice[1].reroll_used);
    assert_eq!(m.team(TeamId::HOME).rerolls, 0);
}

/// Without `execute_with_reroll` a token is never spent.
#[test]
fn test_plain_execute_keeps_tokens() {
    let mut m = ScenarioBuilder::new("keep")
        .unit(TeamId::HOME, "Lineman", pos(5, 7))
        .unit(TeamId::AWAY, "Apprentice", pos(6, 7))
        .rerolls(TeamId::HOME, 1)
        .dice([2, 1, 1])
        .build()
        .unwrap();

    let result = execute(
        &mut m,
        &ActionRequest::Move {
            unit: UnitId(1),
            path: vec![pos(4, 7)],
        },
    )
    .unwrap();

    assert!(result.outcome.is_turnover());
    assert_eq!(m.team(TeamId::HOME).rerolls, 1);
}

// =============================================================================
// Standing Up
// =============================================================================

/// Standing up uses the unit's movement.
#[test]
fn test_stand_up() {
    let mut m = ScenarioBuilder::new("stand")
        .unit(TeamId::HOME, "Lineman", pos(5, 7))
        .state(UnitState::Prone)
        .build()
        .unwrap();

    let result = execute(&mut m, &ActionRequest::StandUp { unit: UnitId(1) }).unwrap();
    assert_eq!(result.outcome, Outcome::Success);
    assert_eq!(m.unit(UnitId(1)).unwrap().state, UnitState::Standing);

    let err = execute(
        &mut m,
        &ActionRequest::Move {
            unit: UnitId(1),
            path: vec![pos(6, 7)],
        },
    )
    .unwrap_err();
    assert_eq!(err, ActionError::Illegal(IllegalAction::AlreadyMoved(UnitId(1))));
}

/// A unit too slow to pay the stand-up cost stays down.
#[test]
fn test_stand_up_needs_movement() {
    let mut m = ScenarioBuilder::new("slow")
        .custom(TeamId::HOME, Stats::new(2, 3, 3, 4, 9), pos(5, 7))
        .state(UnitState::Prone)
        .build()
        .unwrap();

    let err = execute(&mut m, &ActionRequest::StandUp { unit: UnitId(1) }).unwrap_err();
    assert_eq!(
        err,
        ActionError::Illegal(IllegalAction::InsufficientMovement {
            unit: UnitId(1),
            needed: 3,
            remaining: 2,
        })
    );
}

/// Prone units cannot move, standing units cannot stand up.
#[test]
fn test_state_gates_actions() {
    let mut m = ScenarioBuilder::new("gates")
        .unit(TeamId::HOME, "Lineman", pos(5, 7))
        .state(UnitState::Prone)
        .unit(TeamId::HOME, "Lineman", pos(8, 7))
        .build()
        .unwrap();

    let prone_move = execute(
        &mut m,
        &ActionRequest::Move {
            unit: UnitId(1),
            path: vec![pos(6, 7)],
        },
    );
    assert_eq!(
        prone_move.unwrap_err(),
        ActionError::Illegal(IllegalAction::UnitCannotAct {
            unit: UnitId(1),
            state: UnitState::Prone,
        })
    );

    let standing = execute(&mut m, &ActionRequest::StandUp { unit: UnitId(2) });
    assert_eq!(
        standing.unwrap_err(),
        ActionError::Illegal(IllegalAction::NotProne(UnitId(2)))
    );
}

// =============================================================================
// Pathfinder
// =============================================================================

/// The suggestion goes around an enemy tackle zone when the detour fits the
/// allowance.
#[test]
fn test_suggest_path_avoids_tackle_zones() {
    let m = ScenarioBuilder::new("detour")
        .unit(TeamId::HOME, "Lineman", pos(5, 7))
        .unit(TeamId::AWAY, "Apprentice", pos(7, 7))
        .build()
        .unwrap();

    let suggestion = suggest_path(&m, UnitId(1), pos(9, 7)).unwrap();

    assert_eq!(suggestion.risk, 0.0);
    assert_eq!(suggestion.dodges, 0);
    assert_eq!(suggestion.rushes, 0);
    assert_eq!(suggestion.path.len(), 6);
    assert_eq!(suggestion.path.last(), Some(&pos(9, 7)));
    assert!(suggestion.path.iter().all(|c| !c.is_adjacent(pos(7, 7))));
}

/// Cells reachable only by rushing carry the rush risk.
#[test]
fn test_suggest_path_prices_rushes() {
    let m = ScenarioBuilder::new("rushes")
        .unit(TeamId::HOME, "Lineman", pos(2, 2))
        .build()
        .unwrap();

    let suggestion = suggest_path(&m, UnitId(1), pos(10, 2)).unwrap();

    assert_eq!(suggestion.path.len(), 8);
    assert_eq!(suggestion.rushes, 2);
    let expected = 1.0 - (5.0f64 / 6.0).powi(2);
    assert!((suggestion.risk - expected).abs() < 1e-9);

    assert!(suggest_path(&m, UnitId(1), pos(11, 2)).is_none());
}
