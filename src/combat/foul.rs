//! Boot: kicking a Prone opponent.
//!
//! No contest of strength. The target rolls armor with a flat bonus, then
//! the referee rolls a d6 to spot the foul. A spotted booter is ejected for
//! the rest of the match; ejection alone does not end the turn.

use tracing::info;

use super::injury::roll_armor;
use crate::ball::{handling, Ball};
use crate::core::{EventKind, Match, Outcome, Transcript, UnitId};
use crate::dice::{Modifier, ModifierSource, RollKind};
use crate::units::{skill_modifiers, Check, UnitState};

/// Resolve a boot by `booter` on `target`.
pub fn boot(m: &mut Match, log: &mut Transcript, booter: UnitId, target: UnitId) -> Outcome {
    let Some(unit) = m.unit(booter).cloned() else {
        return Outcome::Success;
    };

    log.event(EventKind::Booted {
        unit: booter,
        target,
    });
    log.note(format!("{booter} boots {target}"));

    let mut armor_mods = vec![Modifier::new(ModifierSource::Foul, m.config().foul_armor_bonus)];
    armor_mods.extend(skill_modifiers(&unit.skills, Check::Foul));
    roll_armor(m, log, target, &armor_mods);

    let referee_mods = skill_modifiers(&unit.skills, Check::Referee);
    let spot = m.config().referee_spot_target;
    let referee = m.dice.reach(RollKind::Referee, spot, &referee_mods);
    let spotted = referee.success;
    log.roll(referee);

    if spotted {
        eject(m, log, booter);
    }
    Outcome::Success
}

fn eject(m: &mut Match, log: &mut Transcript, id: UnitId) {
    let pos = m.unit(id).and_then(|u| u.position);

    m.set_state(id, UnitState::Ejected, log);
    m.remove_from_pitch(id, log);
    info!(unit = %id, "ejected");
    log.event(EventKind::Ejected { unit: id });
    log.note(format!("the referee sends {id} off"));

    if let (Some(pos), Ball::Carried(carrier)) = (pos, m.ball) {
        if carrier == id {
            m.set_ball(Ball::Loose(pos), log);
            handling::bounce(m, log, pos, 0);
        }
    }
}
