//! Core match types: ids, dice streams, configuration, errors, actions,
//! events and the match state itself.
//!
//! Everything else in the crate reads and writes a `Match`; the resolvers
//! live in their own modules and only reach in through the crate-private
//! mutators on `Match`.

pub mod action;
pub mod config;
pub mod error;
pub mod event;
pub mod ids;
pub mod rng;
pub mod state;

pub use action::{
    ActionKind, ActionRequest, ActionResult, Delta, Outcome, Transcript, TurnoverReason,
};
pub use config::MatchConfig;
pub use error::{ActionError, IllegalAction, SetupError, SnapshotError};
pub use event::{EventKind, MatchEvent, Message, RollRecord};
pub use ids::{TeamId, TeamMap, UnitId};
pub use rng::{DiceStream, DiceStreamState, GameRng, GameRngState, ScriptedDice};
pub use state::{Match, MatchSummary};
