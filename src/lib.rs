//! # gridball
//!
//! A rules engine for a turn-based, grid-based fantasy sports game: two
//! teams of units on a rectangular pitch, a single ball and dice-driven
//! resolution of movement, contact and ball handling.
//!
//! ## Design Principles
//!
//! 1. **One Mutating Entry Point**: During play, state changes only through
//!    `rules::execute` (and `rules::end_turn`). Requests are validated
//!    first; an illegal request never consumes a die.
//!
//! 2. **Deterministic Dice**: Every random outcome comes from the match's
//!    single `DiceStream`. Seeded streams replay exactly; scripted streams
//!    make any sequence of outcomes testable.
//!
//! 3. **Explain Everything**: Each resolved request returns the dice it
//!    rolled, the state deltas it caused and the events it appended.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: The unit table and logs use `im-rs`,
//!   so a `Match` clones cheaply for what-if analysis and snapshots.
//!
//! - **Free-Function Resolvers**: Movement, ball handling and combat are
//!   functions over `&mut Match` that record into a `Transcript`; the
//!   executor commits the transcript once the request is resolved.
//!
//! ## Modules
//!
//! - `core`: Ids, dice streams, configuration, errors, actions, events, match state
//! - `dice`: Rolls, target-number tests and their probabilities
//! - `pitch`: Positions, occupancy, scoring zones and tackle zones
//! - `units`: Units, teams, rosters and skills
//! - `movement`: Pathfinder and path walking
//! - `ball`: Ball state machine, pickup, catch, bounce and passes
//! - `combat`: Engagements, armor and injury, boots
//! - `setup`: Roster & budget ledger, placement, readiness
//! - `rules`: Turn lifecycle, validation, execution, legal actions
//! - `scenario`: Building mid-match positions directly
//! - `stats`: Team, unit and dice statistics tallied from the logs

pub mod core;
pub mod dice;
pub mod pitch;
pub mod units;
pub mod movement;
pub mod ball;
pub mod combat;
pub mod setup;
pub mod rules;
pub mod scenario;
pub mod stats;

// Re-export commonly used types
pub use crate::core::{
    TeamId, UnitId, TeamMap,
    GameRng, GameRngState, DiceStream, DiceStreamState, ScriptedDice,
    MatchConfig,
    ActionError, IllegalAction, SetupError, SnapshotError,
    ActionKind, ActionRequest, ActionResult, Outcome, TurnoverReason, Delta,
    EventKind, MatchEvent, Message, RollRecord,
    Match, MatchSummary,
};

pub use crate::dice::{DiceOutcome, DiceResolver, Modifier, ModifierSource, RollForm, RollKind};

pub use crate::pitch::{Pitch, Position};

pub use crate::units::{RoleSpec, RosterKind, Skill, Stats, Team, Unit, UnitState};

pub use crate::movement::{legal_moves, path_success, suggest_path, PathPlanner, SuggestedPath};

pub use crate::ball::{Ball, PassAccuracy, PassRange};

pub use crate::combat::{BlockFace, Chooser};

pub use crate::rules::{
    ActionScope, GameResult, Phase, RulesEngine, SharedMatch, StandardRules, TurnChange, TurnState,
    end_turn, execute, execute_with_reroll, kick_off, legal_actions, validate,
};

pub use crate::scenario::ScenarioBuilder;

pub use crate::stats::{DiceTally, MatchStats, TeamStats, UnitStats};
