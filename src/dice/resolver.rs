//! Target-number tests and raw rolls.
//!
//! A test passes when the natural roll reaches the effective target, where
//! the effective target is the printed target minus the summed modifiers,
//! clamped to `2..=6`. A natural 1 therefore always fails and a natural 6
//! always passes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{DiceStream, DiceStreamState};
use crate::units::Skill;

/// What a roll was for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RollKind {
    Dodge,
    Rush,
    Pickup,
    Catch,
    Throw,
    HandOff,
    Engagement,
    Armor,
    Injury,
    Referee,
    Scatter,
}

/// Shape of the roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollForm {
    /// One or more independent d6 (engagement dice, tests).
    Single,
    /// Two d6 added together.
    SumOfTwo,
    /// One d8 (scatter direction).
    Direction,
}

/// Where a modifier came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierSource {
    TackleZones,
    Skill(Skill),
    Distance,
    Foul,
}

/// A signed adjustment to a roll. Positive values help the roller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub source: ModifierSource,
    pub value: i8,
}

impl Modifier {
    #[must_use]
    pub const fn new(source: ModifierSource, value: i8) -> Self {
        Self { source, value }
    }

    /// `-count` for enemy tackle zones, or `None` when there are none.
    #[must_use]
    pub fn tackle_zones(count: u8) -> Option<Self> {
        (count > 0).then(|| Self::new(ModifierSource::TackleZones, -(count as i8)))
    }

    /// Sum a modifier list.
    #[must_use]
    pub fn total(modifiers: &[Modifier]) -> i8 {
        modifiers.iter().map(|m| m.value).sum()
    }
}

/// Record of one roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceOutcome {
    pub kind: RollKind,
    pub form: RollForm,
    /// Natural faces, in the order rolled.
    pub values: SmallVec<[u8; 3]>,
    /// Printed target, when the roll was a test.
    pub target: Option<u8>,
    pub modifiers: SmallVec<[Modifier; 2]>,
    pub success: bool,
    /// True when this roll replaced a failed one using a team reroll.
    pub reroll_used: bool,
}

impl DiceOutcome {
    /// Sum of the natural faces.
    #[must_use]
    pub fn raw_total(&self) -> u8 {
        self.values.iter().sum()
    }

    /// Sum of the faces plus modifiers.
    #[must_use]
    pub fn modified_total(&self) -> i16 {
        self.raw_total() as i16 + Modifier::total(&self.modifiers) as i16
    }
}

/// Probability that a d6 test against `target` with `modifier` succeeds.
///
/// ```
/// use gridball::dice::success_probability;
///
/// assert!((success_probability(3, 0) - 4.0 / 6.0).abs() < 1e-9);
/// assert!((success_probability(6, -3) - 1.0 / 6.0).abs() < 1e-9);
/// assert!((success_probability(2, 4) - 5.0 / 6.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn success_probability(target: u8, modifier: i8) -> f64 {
    let effective = effective_target(target, modifier);
    f64::from(7 - effective) / 6.0
}

fn effective_target(target: u8, modifier: i8) -> u8 {
    (i16::from(target) - i16::from(modifier)).clamp(2, 6) as u8
}

/// Rolls dice from the match's single stream.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "DiceStreamState", from = "DiceStreamState")]
pub struct DiceResolver {
    stream: DiceStream,
}

impl DiceResolver {
    /// Wrap a stream.
    #[must_use]
    pub fn new(stream: DiceStream) -> Self {
        Self { stream }
    }

    /// Access the underlying stream (to capture or extend it).
    pub fn stream_mut(&mut self) -> &mut DiceStream {
        &mut self.stream
    }

    /// Roll one d6.
    pub fn roll_d6(&mut self) -> u8 {
        self.stream.roll(6)
    }

    /// Roll two d6 and add them.
    pub fn roll_2d6(&mut self) -> u8 {
        let [a, b] = self.roll_2d6_faces();
        a + b
    }

    /// Roll two d6, keeping the faces.
    pub fn roll_2d6_faces(&mut self) -> [u8; 2] {
        [self.roll_d6(), self.roll_d6()]
    }

    /// Roll one d8 (scatter direction).
    pub fn roll_d8(&mut self) -> u8 {
        self.stream.roll(8)
    }

    /// Roll a d6 test against `target`.
    pub fn test(&mut self, kind: RollKind, target: u8, modifiers: &[Modifier]) -> DiceOutcome {
        let raw = self.roll_d6();
        let total = Modifier::total(modifiers);
        let success = raw >= effective_target(target, total);

        debug!(?kind, raw, target, modifier = total, success, "dice test");

        DiceOutcome {
            kind,
            form: RollForm::Single,
            values: SmallVec::from_slice(&[raw]),
            target: Some(target),
            modifiers: SmallVec::from_slice(modifiers),
            success,
            reroll_used: false,
        }
    }

    /// Roll `count` independent d6 with no target (engagement dice).
    pub fn pool(&mut self, kind: RollKind, count: u8) -> DiceOutcome {
        let values: SmallVec<[u8; 3]> = (0..count).map(|_| self.roll_d6()).collect();
        debug!(?kind, ?values, "dice pool");

        DiceOutcome {
            kind,
            form: RollForm::Single,
            values,
            target: None,
            modifiers: SmallVec::new(),
            success: true,
            reroll_used: false,
        }
    }

    /// Roll 2d6 plus modifiers against an armor target.
    ///
    /// The armor breaks when the modified total reaches `armor`. The outcome's
    /// `success` reports whether the armor *held*.
    pub fn armor(&mut self, armor: u8, modifiers: &[Modifier]) -> DiceOutcome {
        let faces = self.roll_2d6_faces();
        let total = i16::from(faces[0] + faces[1]) + i16::from(Modifier::total(modifiers));
        let held = total < i16::from(armor);

        debug!(?faces, armor, total, held, "armor roll");

        DiceOutcome {
            kind: RollKind::Armor,
            form: RollForm::SumOfTwo,
            values: SmallVec::from_slice(&faces),
            target: Some(armor),
            modifiers: SmallVec::from_slice(modifiers),
            success: held,
            reroll_used: false,
        }
    }

    /// Roll 2d6 plus modifiers with no target (injury table lookup).
    pub fn sum_of_two(&mut self, kind: RollKind, modifiers: &[Modifier]) -> DiceOutcome {
        let faces = self.roll_2d6_faces();
        debug!(?kind, ?faces, "2d6 roll");

        DiceOutcome {
            kind,
            form: RollForm::SumOfTwo,
            values: SmallVec::from_slice(&faces),
            target: None,
            modifiers: SmallVec::from_slice(modifiers),
            success: true,
            reroll_used: false,
        }
    }

    /// Roll a d6 and compare the *unclamped* modified total with `threshold`.
    ///
    /// Used where a modifier must be able to push the roll out of reach
    /// entirely (the referee spotting a foul).
    pub fn reach(&mut self, kind: RollKind, threshold: u8, modifiers: &[Modifier]) -> DiceOutcome {
        let raw = self.roll_d6();
        let total = i16::from(raw) + i16::from(Modifier::total(modifiers));
        let success = total >= i16::from(threshold);

        debug!(?kind, raw, threshold, total, success, "dice reach");

        DiceOutcome {
            kind,
            form: RollForm::Single,
            values: SmallVec::from_slice(&[raw]),
            target: Some(threshold),
            modifiers: SmallVec::from_slice(modifiers),
            success,
            reroll_used: false,
        }
    }

    /// Roll a d8 direction.
    pub fn direction(&mut self) -> DiceOutcome {
        let face = self.roll_d8();
        DiceOutcome {
            kind: RollKind::Scatter,
            form: RollForm::Direction,
            values: SmallVec::from_slice(&[face]),
            target: None,
            modifiers: SmallVec::new(),
            success: true,
            reroll_used: false,
        }
    }
}

impl From<DiceResolver> for DiceStreamState {
    fn from(resolver: DiceResolver) -> Self {
        resolver.stream.state()
    }
}

impl From<DiceStreamState> for DiceResolver {
    fn from(state: DiceStreamState) -> Self {
        Self::new(DiceStream::from_state(&state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted(faces: &[u8]) -> DiceResolver {
        DiceResolver::new(DiceStream::scripted(faces.iter().copied()))
    }

    #[test]
    fn test_roll_ranges() {
        let mut dice = DiceResolver::new(DiceStream::seeded(9));
        for _ in 0..300 {
            assert!((1..=6).contains(&dice.roll_d6()));
            assert!((2..=12).contains(&dice.roll_2d6()));
            assert!((1..=8).contains(&dice.roll_d8()));
        }
    }

    #[test]
    fn test_target_number() {
        let mut dice = scripted(&[3, 2]);
        assert!(dice.test(RollKind::Pickup, 3, &[]).success);
        assert!(!dice.test(RollKind::Pickup, 3, &[]).success);
    }

    #[test]
    fn test_modifiers_shift_target() {
        let mut dice = scripted(&[4, 4]);
        let tz = Modifier::tackle_zones(1).unwrap();
        assert!(!dice.test(RollKind::Dodge, 4, &[tz]).success);

        let skill = Modifier::new(ModifierSource::Skill(Skill::Dodge), 1);
        assert!(dice.test(RollKind::Dodge, 4, &[tz, skill]).success);
    }

    #[test]
    fn test_natural_one_fails_and_six_passes() {
        let mut dice = scripted(&[1, 6]);
        let big_bonus = Modifier::new(ModifierSource::Distance, 5);
        let big_penalty = Modifier::new(ModifierSource::TackleZones, -5);

        assert!(!dice.test(RollKind::Catch, 2, &[big_bonus]).success);
        assert!(dice.test(RollKind::Catch, 6, &[big_penalty]).success);
    }

    #[test]
    fn test_armor_success_means_held() {
        let mut dice = scripted(&[4, 4, 5, 4]);
        let held = dice.armor(9, &[]);
        assert!(held.success);
        assert_eq!(held.raw_total(), 8);

        let broken = dice.armor(9, &[]);
        assert!(!broken.success);
        assert_eq!(broken.form, RollForm::SumOfTwo);
    }

    #[test]
    fn test_reach_is_not_clamped() {
        let mut dice = scripted(&[6, 6]);
        let sneaky = Modifier::new(ModifierSource::Skill(Skill::SneakyGit), -1);
        assert!(!dice.reach(RollKind::Referee, 6, &[sneaky]).success);
        assert!(dice.reach(RollKind::Referee, 6, &[]).success);
    }

    #[test]
    fn test_pool_keeps_faces() {
        let mut dice = scripted(&[6, 1, 3]);
        let pool = dice.pool(RollKind::Engagement, 3);
        assert_eq!(pool.values.as_slice(), &[6, 1, 3]);
    }

    #[test]
    fn test_probability_clamps() {
        assert!((success_probability(2, 0) - 5.0 / 6.0).abs() < 1e-9);
        assert!((success_probability(6, 0) - 1.0 / 6.0).abs() < 1e-9);
        assert!((success_probability(5, -4) - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolver_serializes_stream_position() {
        let mut dice = scripted(&[2, 3, 4]);
        dice.roll_d6();

        let json = serde_json::to_string(&dice).unwrap();
        let mut back: DiceResolver = serde_json::from_str(&json).unwrap();
        assert_eq!(back.roll_d6(), 3);
    }
}
