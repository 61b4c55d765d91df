//! Typed rejections.
//!
//! Nothing in the engine panics on bad input. Callers get one of:
//! - `IllegalAction`: the request can never succeed in the current state
//!   (caller bug or stale view). Raised before any die is rolled.
//! - `ActionError::MatchConcluded`: the match is over.
//! - `SetupError`: a roster/placement call was refused.
//!
//! A turnover is not an error; it is an `Outcome` on a successful call.

use thiserror::Error;

use super::action::ActionKind;
use super::ids::{TeamId, UnitId};
use crate::pitch::Position;
use crate::rules::Phase;
use crate::units::UnitState;

/// Why a request was rejected without touching the match.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IllegalAction {
    #[error("action not allowed during {0:?}")]
    WrongPhase(Phase),
    #[error("it is not {0}'s turn")]
    NotYourTurn(TeamId),
    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),
    #[error("{0} is not on the pitch")]
    NotOnPitch(UnitId),
    #[error("{unit} cannot act while {state:?}")]
    UnitCannotAct { unit: UnitId, state: UnitState },
    #[error("{0} is not prone")]
    NotProne(UnitId),
    #[error("{0} has already moved this turn")]
    AlreadyMoved(UnitId),
    #[error("{0} has already taken an action this turn")]
    AlreadyActed(UnitId),
    #[error("{0:?} already used this turn")]
    QuotaExhausted(ActionKind),
    #[error("{unit} needs {needed} movement but has {remaining}")]
    InsufficientMovement { unit: UnitId, needed: u8, remaining: u8 },
    #[error("path is empty")]
    EmptyPath,
    #[error("path of {len} squares exceeds the {max} available")]
    PathTooLong { len: usize, max: usize },
    #[error("path step to {0} is not adjacent to the previous square")]
    PathNotContiguous(Position),
    #[error("path leaves the pitch at {0}")]
    PathOutOfBounds(Position),
    #[error("path is blocked at {0}")]
    PathBlocked(Position),
    #[error("path runs over the loose ball at {0} without stopping")]
    PathCrossesBall(Position),
    #[error("{unit} is not adjacent to {target}")]
    NotAdjacent { unit: UnitId, target: UnitId },
    #[error("{target} is not a valid target: {reason}")]
    InvalidTarget { target: UnitId, reason: &'static str },
    #[error("{0} is not carrying the ball")]
    NotBallCarrier(UnitId),
    #[error("target {0} is off the pitch")]
    TargetOutOfBounds(Position),
    #[error("throw distance {distance} exceeds the maximum of {max}")]
    OutOfRange { distance: i32, max: i32 },
    #[error("cannot throw to the thrower's own cell")]
    ThrowToSelf,
}

/// Error returned by `execute` and `end_turn`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("illegal action: {0}")]
    Illegal(#[from] IllegalAction),
    #[error("match concluded")]
    MatchConcluded,
}

impl ActionError {
    /// The illegal-action reason, if this is not `MatchConcluded`.
    #[must_use]
    pub fn illegal(&self) -> Option<&IllegalAction> {
        match self {
            ActionError::Illegal(reason) => Some(reason),
            ActionError::MatchConcluded => None,
        }
    }
}

/// Failure to encode or decode a match snapshot.
#[derive(Debug, Error)]
#[error("snapshot codec: {0}")]
pub struct SnapshotError(#[from] bincode::Error);

/// Why a roster, placement or phase call was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("not allowed during {0:?}")]
    WrongPhase(Phase),
    #[error("roster has no role named {0:?}")]
    UnknownRole(String),
    #[error("needs {needed} but only {remaining} remains")]
    InsufficientBudget { needed: u32, remaining: u32 },
    #[error("role {role:?} is limited to {max}")]
    RoleQuotaExceeded { role: String, max: u8 },
    #[error("roster is full ({max} units)")]
    RosterFull { max: usize },
    #[error("reroll limit of {max} reached")]
    RerollLimit { max: u8 },
    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),
    #[error("{unit} does not belong to {team}")]
    NotYourUnit { unit: UnitId, team: TeamId },
    #[error("{0} is off the pitch")]
    OutOfBounds(Position),
    #[error("{0} is occupied")]
    Occupied(Position),
    #[error("{0} is on the wrong half for {1}")]
    WrongHalf(Position, TeamId),
    #[error("no more than {max} units may be on the pitch")]
    TooManyOnPitch { max: usize },
    #[error("roster has {have} units, needs {need}")]
    RosterTooSmall { have: usize, need: usize },
    #[error("no units placed on the pitch")]
    NoUnitsPlaced,
    #[error("{0} is already ready")]
    AlreadyReady(TeamId),
    #[error("team is marked ready; roster is locked")]
    RosterLocked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_converts_into_action_error() {
        let err: ActionError = IllegalAction::EmptyPath.into();
        assert_eq!(err.illegal(), Some(&IllegalAction::EmptyPath));
        assert_eq!(ActionError::MatchConcluded.illegal(), None);
    }

    #[test]
    fn test_messages_are_readable() {
        let err = IllegalAction::QuotaExhausted(ActionKind::Throw);
        assert_eq!(err.to_string(), "Throw already used this turn");

        let err = SetupError::InsufficientBudget { needed: 50_000, remaining: 10_000 };
        assert_eq!(err.to_string(), "needs 50000 but only 10000 remains");
    }
}
