//! Dice resolver: the probability primitives every other resolver uses.
//!
//! - `DiceResolver`: rolls d6 / 2d6 / d8 from the match's single `DiceStream`
//!   and runs target-number tests
//! - `DiceOutcome`: the record of one roll, returned to callers verbatim
//! - `success_probability`: closed-form odds used by the pathfinder

mod resolver;

pub use resolver::{
    success_probability, DiceOutcome, DiceResolver, Modifier, ModifierSource, RollForm, RollKind,
};
