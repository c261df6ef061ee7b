//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Each handler prints
//! its own output and returns errors to `main`.

pub mod balance;
pub mod expense;
pub mod group;

pub use balance::{handle_balances_command, handle_summary_command};
pub use expense::{
    handle_expense_command, handle_pay_command, handle_settle_command, ExpenseCommands, PayArgs,
    SettleArgs,
};
pub use group::{handle_group_command, GroupCommands};
