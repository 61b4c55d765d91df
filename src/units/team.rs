//! A team: roster membership, treasury, rerolls and readiness.

use serde::{Deserialize, Serialize};

use super::roster::RosterKind;
use crate::core::{TeamId, UnitId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub roster: RosterKind,
    /// Owned units in purchase order.
    pub units: Vec<UnitId>,
    /// Remaining treasury. Only spent during setup.
    pub budget: u32,
    /// Remaining team reroll tokens.
    pub rerolls: u8,
    pub ready: bool,
}

impl Team {
    #[must_use]
    pub fn new(id: TeamId, roster: RosterKind, budget: u32) -> Self {
        Self {
            id,
            roster,
            units: Vec::new(),
            budget,
            rerolls: 0,
            ready: false,
        }
    }

    /// Take `amount` from the treasury. Fails without change if short.
    pub(crate) fn spend(&mut self, amount: u32) -> bool {
        match self.budget.checked_sub(amount) {
            Some(left) => {
                self.budget = left;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn owns(&self, unit: UnitId) -> bool {
        self.units.contains(&unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_never_negative() {
        let mut team = Team::new(TeamId::HOME, RosterKind::Watch, 100_000);
        assert!(team.spend(80_000));
        assert!(!team.spend(80_000));
        assert_eq!(team.budget, 20_000);
    }
}
