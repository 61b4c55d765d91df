//! Match statistics.
//!
//! Nothing here is stored on the match. `MatchStats::collect` walks the
//! event log and the roll log each time it is called, so the numbers always
//! agree with what was recorded, including across a `reset`.

mod tally;

pub use tally::{DiceTally, MatchStats, TeamStats, UnitStats};
