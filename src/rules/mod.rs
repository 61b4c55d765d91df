//! Rules engine: turn lifecycle, validation, execution and legal moves.
//!
//! - `turn`: phases, turn ownership, halves and turnovers
//! - `validate`: legality checks (no mutation, no dice)
//! - `execute`: the single mutating entry point for play
//! - `legal`: enumerating legal requests
//! - `engine`: `RulesEngine` trait, `StandardRules` and `GameResult`
//!
//! Front ends drive a match through `RulesEngine` but never interpret
//! dice or pitch geometry directly.

pub mod engine;
pub mod execute;
pub mod legal;
pub mod turn;
pub mod validate;

pub use engine::{GameResult, RulesEngine, SharedMatch, StandardRules};
pub use execute::{execute, execute_with_reroll};
pub use legal::{legal_actions, ActionScope};
pub use turn::{end_turn, kick_off, Activation, Phase, TurnChange, TurnState};
pub use validate::validate;

pub(crate) use turn::{change_phase, finish_turn};
