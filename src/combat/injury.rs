//! Falling over: armor, then injury.

use tracing::debug;

use crate::ball::{handling, Ball};
use crate::core::{EventKind, Match, Transcript, UnitId};
use crate::dice::{Modifier, RollKind};
use crate::units::{skill_modifiers, Check, Skill, UnitState};

/// Injury band for a modified 2d6 total.
///
/// 2-7 Stunned, 8-9 Knocked Out, 10+ Casualty. Thick Skull turns a total of
/// exactly 8 into Stunned.
#[must_use]
pub fn injury_band(total: i16, thick_skull: bool) -> UnitState {
    match total {
        ..=7 => UnitState::Stunned,
        8 if thick_skull => UnitState::Stunned,
        8..=9 => UnitState::KnockedOut,
        _ => UnitState::Casualty,
    }
}

/// Knock a unit down where it stands.
///
/// The unit goes Prone, drops the ball if it had it, then rolls armor.
/// `armor_mods` come from whoever caused the fall (Mighty Blow).
pub(crate) fn knock_down(m: &mut Match, log: &mut Transcript, id: UnitId, armor_mods: &[Modifier]) {
    let Some(pos) = m.unit(id).and_then(|u| u.position) else {
        return;
    };

    m.set_state(id, UnitState::Prone, log);
    log.event(EventKind::UnitKnockedDown { unit: id });
    log.note(format!("{id} goes down"));

    if m.ball == Ball::Carried(id) {
        m.set_ball(Ball::Loose(pos), log);
        handling::bounce(m, log, pos, 0);
    }

    roll_armor(m, log, id, armor_mods);
}

/// Armor roll against a unit that is already down; injury if it breaks.
pub(crate) fn roll_armor(m: &mut Match, log: &mut Transcript, id: UnitId, armor_mods: &[Modifier]) {
    let Some(armor) = m.unit(id).map(|u| u.stats.armor) else {
        return;
    };

    let roll = m.dice.armor(armor, armor_mods);
    let held = roll.success;
    log.roll(roll);

    if held {
        debug!(unit = %id, "armor held");
        return;
    }
    log.event(EventKind::ArmorBroken { unit: id });
    roll_injury(m, log, id);
}

fn roll_injury(m: &mut Match, log: &mut Transcript, id: UnitId) {
    let Some(unit) = m.unit(id) else {
        return;
    };
    let mods = skill_modifiers(&unit.skills, Check::SufferInjury);
    let thick_skull = unit.has_skill(Skill::ThickSkull);

    let roll = m.dice.sum_of_two(RollKind::Injury, &mods);
    let state = injury_band(roll.modified_total(), thick_skull);
    log.roll(roll);

    debug!(unit = %id, ?state, "injury");
    m.set_state(id, state, log);
    log.event(EventKind::Injured { unit: id, state });
    log.note(format!("{id} is {state:?}"));

    match state {
        UnitState::Stunned => {
            if let Some(unit) = m.unit_mut(id) {
                unit.stunned_this_turn = true;
            }
        }
        _ => m.remove_from_pitch(id, log),
    }
}
