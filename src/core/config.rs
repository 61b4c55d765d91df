//! Match configuration.
//!
//! Every rule constant the engine consults lives here so a match can be
//! played on a smaller pitch or with shorter halves (useful for tests and
//! training) without touching the resolvers. `MatchConfig::default()` is the
//! standard match.

use serde::{Deserialize, Serialize};

/// Rule constants for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Pitch columns (x axis). Each team's end zone sits at an edge.
    pub pitch_width: i32,

    /// Pitch rows (y axis).
    pub pitch_height: i32,

    /// Turns each team plays per half.
    pub turns_per_half: u8,

    /// Minimum units a team must own before it can mark itself ready.
    pub min_roster: usize,

    /// Maximum units a team may own.
    pub max_roster: usize,

    /// Maximum units a team may have on the pitch at once.
    pub max_on_pitch: usize,

    /// Starting treasury for each team.
    pub starting_budget: u32,

    /// Maximum team reroll tokens that can be bought.
    pub max_rerolls: u8,

    /// Movement allowance spent by standing up.
    pub stand_up_cost: u8,

    /// Extra squares a unit may rush beyond its allowance.
    pub max_rush_squares: u8,

    /// How many columns at each edge count as the end zone.
    pub end_zone_depth: i32,

    /// Flat bonus added to the armor roll of a boot.
    pub foul_armor_bonus: i8,

    /// A referee d6 at or above this ejects the booting unit.
    pub referee_spot_target: u8,

    /// Maximum number of consecutive bounces before a loose ball settles.
    pub max_bounces: u8,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            pitch_width: 26,
            pitch_height: 15,
            turns_per_half: 8,
            min_roster: 3,
            max_roster: 16,
            max_on_pitch: 11,
            starting_budget: 1_000_000,
            max_rerolls: 8,
            stand_up_cost: 3,
            max_rush_squares: 2,
            end_zone_depth: 3,
            foul_armor_bonus: 1,
            referee_spot_target: 6,
            max_bounces: 8,
        }
    }
}

impl MatchConfig {
    /// Create the standard configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set turns per half.
    #[must_use]
    pub fn with_turns_per_half(mut self, turns: u8) -> Self {
        self.turns_per_half = turns.max(1);
        self
    }

    /// Set roster bounds.
    #[must_use]
    pub fn with_roster_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_roster = min;
        self.max_roster = max.max(min);
        self
    }

    /// Set starting budget.
    #[must_use]
    pub fn with_budget(mut self, budget: u32) -> Self {
        self.starting_budget = budget;
        self
    }

    /// Set the end zone depth.
    #[must_use]
    pub fn with_end_zone_depth(mut self, depth: i32) -> Self {
        self.end_zone_depth = depth.clamp(1, self.pitch_width / 2);
        self
    }

    /// Cap bounce chains. Zero means a bouncing ball settles at once.
    #[must_use]
    pub fn with_max_bounces(mut self, bounces: u8) -> Self {
        self.max_bounces = bounces;
        self
    }

    /// Set the referee's spot target for boots.
    #[must_use]
    pub fn with_referee_spot_target(mut self, target: u8) -> Self {
        self.referee_spot_target = target;
        self
    }

    /// The column that divides the two setup halves.
    ///
    /// Home places in columns `0..halfway`, away in `halfway..width`.
    #[must_use]
    pub fn halfway_column(&self) -> i32 {
        self.pitch_width / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_standard_match() {
        let config = MatchConfig::default();
        assert_eq!(config.pitch_width, 26);
        assert_eq!(config.pitch_height, 15);
        assert_eq!(config.turns_per_half, 8);
        assert_eq!(config.end_zone_depth, 3);
        assert_eq!(config.halfway_column(), 13);
    }

    #[test]
    fn test_builder() {
        let config = MatchConfig::new()
            .with_turns_per_half(2)
            .with_roster_bounds(1, 4)
            .with_budget(200_000)
            .with_end_zone_depth(2)
            .with_max_bounces(2);

        assert_eq!(config.turns_per_half, 2);
        assert_eq!(config.min_roster, 1);
        assert_eq!(config.max_roster, 4);
        assert_eq!(config.starting_budget, 200_000);
        assert_eq!(config.end_zone_depth, 2);
        assert_eq!(config.max_bounces, 2);
    }

    #[test]
    fn test_roster_bounds_never_invert() {
        let config = MatchConfig::new().with_roster_bounds(5, 2);
        assert_eq!(config.max_roster, 5);
    }

    #[test]
    fn test_config_serialization() {
        let config = MatchConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: MatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
