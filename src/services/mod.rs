//! Service layer for splitledger
//!
//! Ties the ledger engine to storage: looks up groups, validates through the
//! engine, persists the result and logs what happened.

pub mod balance;
pub mod expense;
pub mod group;

pub use balance::BalanceService;
pub use expense::{CreateExpenseInput, ExpenseService, SettlementInput};
pub use group::{CreateGroupInput, GroupService};
