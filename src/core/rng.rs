//! Deterministic random number generation for match replay.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Serializable**: O(1) state capture and restore
//! - **Scriptable**: A `ScriptedDice` queue replays exact faces for tests
//!   and recorded matches
//!
//! Every die the engine rolls is drawn from one `DiceStream`, injected when
//! the match is created.
//!
//! ```
//! use gridball::core::GameRng;
//!
//! let mut rng1 = GameRng::new(42);
//! let mut rng2 = GameRng::new(42);
//! assert_eq!(rng1.roll(6), rng2.roll(6));
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Roll a die with `sides` faces, returning `1..=sides`.
    pub fn roll(&mut self, sides: u8) -> u8 {
        self.inner.gen_range(1..=sides)
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many dice have been rolled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// A queue of pre-determined faces, falling back to a seeded RNG once empty.
///
/// Faces larger than the die being rolled wrap around, so a script written
/// for d6 rolls stays valid when the engine asks for a d8 scatter.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    faces: VecDeque<u8>,
    fallback: GameRng,
}

impl ScriptedDice {
    /// Create a script from the faces to return, in order.
    #[must_use]
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            fallback: GameRng::new(0),
        }
    }

    /// Append more faces to the end of the script.
    pub fn extend(&mut self, faces: impl IntoIterator<Item = u8>) {
        self.faces.extend(faces);
    }

    /// Faces not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }

    fn roll(&mut self, sides: u8) -> u8 {
        match self.faces.pop_front() {
            Some(face) => (face.max(1) - 1) % sides + 1,
            None => self.fallback.roll(sides),
        }
    }
}

/// The single source of randomness for a match.
#[derive(Clone, Debug)]
pub enum DiceStream {
    /// Pseudo-random dice from a seed.
    Seeded(GameRng),
    /// Exact faces supplied by the caller.
    Scripted(ScriptedDice),
}

impl DiceStream {
    /// Seeded stream.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        DiceStream::Seeded(GameRng::new(seed))
    }

    /// Scripted stream.
    #[must_use]
    pub fn scripted(faces: impl IntoIterator<Item = u8>) -> Self {
        DiceStream::Scripted(ScriptedDice::new(faces))
    }

    /// Roll a die with `sides` faces.
    pub fn roll(&mut self, sides: u8) -> u8 {
        match self {
            DiceStream::Seeded(rng) => rng.roll(sides),
            DiceStream::Scripted(script) => script.roll(sides),
        }
    }

    /// Capture the stream position.
    #[must_use]
    pub fn state(&self) -> DiceStreamState {
        match self {
            DiceStream::Seeded(rng) => DiceStreamState::Seeded(rng.state()),
            DiceStream::Scripted(script) => DiceStreamState::Scripted {
                faces: script.faces.iter().copied().collect(),
                fallback: script.fallback.state(),
            },
        }
    }

    /// Rebuild a stream from a captured position.
    #[must_use]
    pub fn from_state(state: &DiceStreamState) -> Self {
        match state {
            DiceStreamState::Seeded(rng) => DiceStream::Seeded(GameRng::from_state(rng)),
            DiceStreamState::Scripted { faces, fallback } => DiceStream::Scripted(ScriptedDice {
                faces: faces.iter().copied().collect(),
                fallback: GameRng::from_state(fallback),
            }),
        }
    }
}

/// Serializable form of a `DiceStream`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiceStreamState {
    Seeded(GameRngState),
    Scripted {
        faces: Vec<u8>,
        fallback: GameRngState,
    },
}

impl From<DiceStream> for DiceStreamState {
    fn from(stream: DiceStream) -> Self {
        stream.state()
    }
}

impl From<DiceStreamState> for DiceStream {
    fn from(state: DiceStreamState) -> Self {
        DiceStream::from_state(&state)
    }
}
