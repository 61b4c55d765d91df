//! Setup phase: the roster & budget ledger.

mod ledger;

pub use ledger::{
    available_roles, budget_status, mark_ready, own_half, place, purchase, purchase_reroll, unplace, AvailableRole,
    BudgetStatus, Purchase,
};
