//! Split-expense ledger core
//!
//! Pure functions over groups and expenses: splitting a total between members,
//! recording settlements, tracking payment status, and folding a group's history
//! into per-member balances. Persistence lives in `storage`; orchestration in
//! `services`.

pub mod balances;
pub mod expense;
pub mod payments;
pub mod settlement;
pub mod splits;

pub use balances::compute_balances;
pub use expense::{create_expense, ExpenseRequest};
pub use payments::{apply_payments, PaymentUpdate};
pub use settlement::{record_settlement, SettlementRequest};
pub use splits::{
    compute_splits, EqualSplit, ExactAmount, ExactSplit, PercentShare, PercentSplit,
    SettlementSplit, ShareCount, SharesSplit, SplitRule, SplitStrategy, StrategyInput,
};
