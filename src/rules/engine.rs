//! Rules engine trait and match results.
//!
//! `RulesEngine` is the seam a front end (or a search loop) drives a match
//! through:
//! - What requests are legal
//! - How a request changes the match
//! - When the match is over
//!
//! `StandardRules` is the only implementation and delegates to the free
//! functions in this module's siblings.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::execute::{execute, execute_with_reroll};
use super::legal::{legal_actions, ActionScope};
use super::turn::{end_turn, Phase, TurnChange};
use crate::core::{ActionError, ActionRequest, ActionResult, Match, TeamId, TeamMap};

/// A match shared between sessions. All mutation goes through the lock, so
/// requests against one match are serialized.
pub type SharedMatch = Arc<Mutex<Match>>;

/// Result of a finished match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(TeamId),
    /// Level score.
    Draw,
}

impl GameResult {
    /// Result for a final score.
    #[must_use]
    pub fn from_score(score: &TeamMap<u8>) -> Self {
        let home = score[TeamId::HOME];
        let away = score[TeamId::AWAY];
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => GameResult::Winner(TeamId::HOME),
            std::cmp::Ordering::Less => GameResult::Winner(TeamId::AWAY),
            std::cmp::Ordering::Equal => GameResult::Draw,
        }
    }

    /// Check if a team won.
    #[must_use]
    pub fn is_winner(&self, team: TeamId) -> bool {
        matches!(self, GameResult::Winner(t) if *t == team)
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: Return empty if the scope can't act
/// - `execute`: Must be deterministic given the match's dice stream
/// - `is_terminal`: Return None if the match continues
pub trait RulesEngine {
    /// Legal requests for a unit or a whole team.
    fn legal_actions(&self, m: &Match, scope: ActionScope) -> Vec<ActionRequest>;

    /// Validate and resolve one request.
    fn execute(&self, m: &mut Match, request: &ActionRequest) -> Result<ActionResult, ActionError>;

    /// Hand the turn over.
    fn end_turn(&self, m: &mut Match, team: TeamId) -> Result<TurnChange, ActionError>;

    /// As `execute`, allowing one team reroll on the first failed test.
    fn execute_with_reroll(
        &self,
        m: &mut Match,
        request: &ActionRequest,
    ) -> Result<ActionResult, ActionError>;

    /// `Some(result)` once the match is finished.
    fn is_terminal(&self, m: &Match) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Run `request` against a shared match.
    fn execute_shared(
        &self,
        shared: &SharedMatch,
        request: &ActionRequest,
    ) -> Result<ActionResult, ActionError> {
        // A poisoned lock still holds a consistent match: every mutation
        // completes before the guard drops.
        let mut guard = shared.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        self.execute(&mut guard, request)
    }
}

/// The standard rule set.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardRules;

impl RulesEngine for StandardRules {
    fn legal_actions(&self, m: &Match, scope: ActionScope) -> Vec<ActionRequest> {
        legal_actions(m, scope)
    }

    fn execute(&self, m: &mut Match, request: &ActionRequest) -> Result<ActionResult, ActionError> {
        execute(m, request)
    }

    fn end_turn(&self, m: &mut Match, team: TeamId) -> Result<TurnChange, ActionError> {
        end_turn(m, team)
    }

    fn execute_with_reroll(
        &self,
        m: &mut Match,
        request: &ActionRequest,
    ) -> Result<ActionResult, ActionError> {
        execute_with_reroll(m, request)
    }

    fn is_terminal(&self, m: &Match) -> Option<GameResult> {
        (m.phase() == Phase::Finished).then(|| GameResult::from_score(&m.score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(TeamId::AWAY);
        assert!(!result.is_winner(TeamId::HOME));
        assert!(result.is_winner(TeamId::AWAY));

        let draw = GameResult::Draw;
        assert!(!draw.is_winner(TeamId::HOME));
        assert!(!draw.is_winner(TeamId::AWAY));
    }

    #[test]
    fn test_result_from_score() {
        let mut score = TeamMap::with_value(0u8);
        assert_eq!(GameResult::from_score(&score), GameResult::Draw);

        score[TeamId::HOME] = 2;
        score[TeamId::AWAY] = 1;
        assert_eq!(GameResult::from_score(&score), GameResult::Winner(TeamId::HOME));

        score[TeamId::AWAY] = 3;
        assert_eq!(GameResult::from_score(&score), GameResult::Winner(TeamId::AWAY));
    }
}
