//! Structured match events.
//!
//! Every state change the engine makes (setup, kickoff, actions, turn and
//! half transitions) appends a `MatchEvent` to the match log. Events carry
//! their own sequence number plus the half/turn/team context at the time they
//! were recorded, so the log can be replayed or summarised without the state.
//! Dice go to a separate roll log (`RollRecord`) so the event log stays one
//! entry per state change.

use serde::{Deserialize, Serialize};

use super::action::TurnoverReason;
use super::ids::{TeamId, UnitId};
use crate::ball::PassAccuracy;
use crate::combat::BlockFace;
use crate::dice::DiceOutcome;
use crate::pitch::Position;
use crate::rules::{GameResult, Phase};
use crate::units::UnitState;

/// What happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    // === Setup ===
    UnitPurchased { team: TeamId, unit: UnitId, role: String },
    RerollPurchased { team: TeamId, total: u8 },
    UnitPlaced { unit: UnitId, at: Position },
    UnitUnplaced { unit: UnitId },
    TeamReady { team: TeamId },

    // === Lifecycle ===
    PhaseChanged { from: Phase, to: Phase },
    KickedOff { half: u8, receiving: TeamId },
    TurnStarted { team: TeamId, turn: u8 },
    TurnEnded { team: TeamId, turnover: Option<TurnoverReason> },
    HalfEnded { half: u8 },
    MatchFinished { result: GameResult },
    MatchReset,

    // === Play ===
    UnitMoved { unit: UnitId, from: Position, to: Position },
    UnitStoodUp { unit: UnitId },
    DodgeFailed { unit: UnitId },
    RushFailed { unit: UnitId },
    Engagement { attacker: UnitId, defender: UnitId, result: BlockFace },
    UnitPushed { unit: UnitId, from: Position, to: Position },
    UnitKnockedDown { unit: UnitId },
    ArmorBroken { unit: UnitId },
    Injured { unit: UnitId, state: UnitState },
    Recovered { unit: UnitId },
    Booted { unit: UnitId, target: UnitId },
    Ejected { unit: UnitId },
    BallPickedUp { unit: UnitId },
    PickupFailed { unit: UnitId },
    BallThrown { unit: UnitId, target: Position, accuracy: PassAccuracy },
    BallCaught { unit: UnitId },
    CatchFailed { unit: UnitId },
    HandedOff { from: UnitId, to: UnitId },
    BallBounced { from: Position, to: Position },
    /// The ball was set down for a restart.
    BallPlaced { at: Position },
    Touchdown { team: TeamId, unit: UnitId },
    Turnover { team: TeamId, reason: TurnoverReason },
    RerollUsed { team: TeamId },
}

/// An event with its position in the match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Monotonic sequence number within the match.
    pub seq: u64,
    pub half: u8,
    /// Turn counter of the active team, 0 outside active play.
    pub turn: u8,
    /// Active team, if any.
    pub team: Option<TeamId>,
    pub kind: EventKind,
}

/// A die roll kept in the match's roll log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRecord {
    /// Active team when the roll was made.
    pub team: Option<TeamId>,
    pub outcome: DiceOutcome,
}

/// A free-form message posted to the match (chat, commentary, agent notes).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub seq: u64,
    pub author: String,
    pub text: String,
}
