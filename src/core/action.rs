//! Action requests and results.
//!
//! `ActionRequest` is the closed set of intents a caller may issue. Every
//! variant names the acting unit; the executor matches exhaustively, so a new
//! variant fails to compile until every stage handles it.
//!
//! `ActionResult` is what a legal request produces: an `Outcome`, every die
//! rolled, the state changes applied and the events appended to the match
//! log.

use serde::{Deserialize, Serialize};

use super::event::{EventKind, MatchEvent};
use super::ids::{TeamId, UnitId};
use crate::ball::Ball;
use crate::dice::DiceOutcome;
use crate::pitch::Position;
use crate::units::UnitState;

/// The kind of an action, without its arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Move,
    StandUp,
    Engage,
    Charge,
    Throw,
    QuickPass,
    Boot,
}

impl ActionKind {
    /// Actions limited to one use per team-turn.
    #[must_use]
    pub const fn is_once_per_turn(self) -> bool {
        matches!(
            self,
            ActionKind::Charge | ActionKind::Throw | ActionKind::QuickPass | ActionKind::Boot
        )
    }

    /// Actions that count as the unit's movement for the turn.
    #[must_use]
    pub const fn is_movement(self) -> bool {
        matches!(self, ActionKind::Move | ActionKind::StandUp | ActionKind::Charge)
    }
}

/// A caller's intent.
///
/// ```
/// use gridball::core::{ActionKind, ActionRequest, UnitId};
/// use gridball::pitch::Position;
///
/// let request = ActionRequest::Move {
///     unit: UnitId(3),
///     path: vec![Position::new(6, 7), Position::new(7, 7)],
/// };
/// assert_eq!(request.unit(), UnitId(3));
/// assert_eq!(request.kind(), ActionKind::Move);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionRequest {
    /// Walk along `path` (excluding the starting cell).
    Move { unit: UnitId, path: Vec<Position> },
    /// Get up from Prone.
    StandUp { unit: UnitId },
    /// Engage an adjacent opponent.
    Engage { unit: UnitId, target: UnitId },
    /// Move along `path`, then engage `target`.
    Charge {
        unit: UnitId,
        path: Vec<Position>,
        target: UnitId,
    },
    /// Throw the ball at a cell. (Called a hurl in the rulebook.)
    Throw { unit: UnitId, target: Position },
    /// Hand the ball to an adjacent teammate.
    QuickPass { unit: UnitId, receiver: UnitId },
    /// Foul a Prone adjacent opponent.
    Boot { unit: UnitId, target: UnitId },
}

impl ActionRequest {
    /// The acting unit.
    #[must_use]
    pub fn unit(&self) -> UnitId {
        match self {
            ActionRequest::Move { unit, .. }
            | ActionRequest::StandUp { unit }
            | ActionRequest::Engage { unit, .. }
            | ActionRequest::Charge { unit, .. }
            | ActionRequest::Throw { unit, .. }
            | ActionRequest::QuickPass { unit, .. }
            | ActionRequest::Boot { unit, .. } => *unit,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionRequest::Move { .. } => ActionKind::Move,
            ActionRequest::StandUp { .. } => ActionKind::StandUp,
            ActionRequest::Engage { .. } => ActionKind::Engage,
            ActionRequest::Charge { .. } => ActionKind::Charge,
            ActionRequest::Throw { .. } => ActionKind::Throw,
            ActionRequest::QuickPass { .. } => ActionKind::QuickPass,
            ActionRequest::Boot { .. } => ActionKind::Boot,
        }
    }
}

/// Why a turn ended early.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnoverReason {
    FailedDodge,
    FailedRush,
    FailedPickup,
    FailedCatch,
    FumbledPass,
    FailedHandOff,
    /// A throw that did not end in the thrower's team's hands.
    IncompletePass,
    /// The active team lost the ball.
    BallLost,
    /// A unit of the active team was knocked down.
    UnitDown,
    /// A touchdown always ends the turn.
    Touchdown,
}

/// How a legal action turned out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Turnover(TurnoverReason),
}

impl Outcome {
    #[must_use]
    pub const fn is_turnover(self) -> bool {
        matches!(self, Outcome::Turnover(_))
    }

    #[must_use]
    pub const fn turnover_reason(self) -> Option<TurnoverReason> {
        match self {
            Outcome::Turnover(reason) => Some(reason),
            Outcome::Success => None,
        }
    }
}

/// One observable state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delta {
    Moved {
        unit: UnitId,
        from: Position,
        to: Position,
    },
    StateChanged {
        unit: UnitId,
        from: UnitState,
        to: UnitState,
    },
    LeftPitch {
        unit: UnitId,
        from: Position,
    },
    Ball {
        from: Ball,
        to: Ball,
    },
    Score {
        team: TeamId,
        score: u8,
    },
    RerollSpent {
        team: TeamId,
        remaining: u8,
    },
}

/// Result of one `execute` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub request: ActionRequest,
    pub outcome: Outcome,
    /// Every die rolled, in order.
    pub dice: Vec<DiceOutcome>,
    pub deltas: Vec<Delta>,
    /// Events appended to the match log by this action.
    pub events: Vec<MatchEvent>,
    pub description: String,
}

impl ActionResult {
    #[must_use]
    pub fn is_turnover(&self) -> bool {
        self.outcome.is_turnover()
    }
}

/// Working record threaded through the resolvers while an action runs.
///
/// Resolvers push dice, deltas and event payloads here; the executor turns
/// it into an `ActionResult` once the action is complete.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    pub dice: Vec<DiceOutcome>,
    pub deltas: Vec<Delta>,
    pub events: Vec<EventKind>,
    pub notes: Vec<String>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roll(&mut self, outcome: DiceOutcome) {
        self.dice.push(outcome);
    }

    pub fn delta(&mut self, delta: Delta) {
        self.deltas.push(delta);
    }

    pub fn event(&mut self, event: EventKind) {
        self.events.push(event);
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Human-readable summary of the notes, in order.
    #[must_use]
    pub fn describe(&self) -> String {
        self.notes.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_kinds() {
        assert!(ActionKind::Charge.is_once_per_turn());
        assert!(ActionKind::Throw.is_once_per_turn());
        assert!(ActionKind::QuickPass.is_once_per_turn());
        assert!(ActionKind::Boot.is_once_per_turn());
        assert!(!ActionKind::Move.is_once_per_turn());
        assert!(!ActionKind::Engage.is_once_per_turn());
    }

    #[test]
    fn test_request_accessors() {
        let request = ActionRequest::Charge {
            unit: UnitId(4),
            path: vec![Position::new(1, 1)],
            target: UnitId(9),
        };
        assert_eq!(request.unit(), UnitId(4));
        assert_eq!(request.kind(), ActionKind::Charge);
        assert!(request.kind().is_movement());
    }

    #[test]
    fn test_outcome_reason() {
        assert_eq!(Outcome::Success.turnover_reason(), None);
        let outcome = Outcome::Turnover(TurnoverReason::FailedDodge);
        assert!(outcome.is_turnover());
        assert_eq!(outcome.turnover_reason(), Some(TurnoverReason::FailedDodge));
    }

    #[test]
    fn test_transcript_description() {
        let mut log = Transcript::new();
        log.note("unit#1 moves");
        log.note("unit#1 picks up the ball");
        assert_eq!(log.describe(), "unit#1 moves; unit#1 picks up the ball");
    }
}
