//! Mid-match positions built directly, skipping the setup ledger.
//!
//! Used by tests, replays and analysis tools that want a specific board
//! (units placed, ball somewhere, a given team to act) without buying and
//! kicking off a full match.

mod builder;

pub use builder::ScenarioBuilder;
