//! splitledger - shared-expense ledger for groups
//!
//! Records what a group spends, splits each expense between members by one of
//! several strategies, tracks per-member payment status, and derives who owes
//! whom from the full history.
//!
//! # Architecture
//!
//! - `ledger`: pure split, settlement, payment and balance logic
//! - `models`: groups, members, expenses, splits, money and balance views
//! - `storage`: JSON file repositories with atomic writes
//! - `services`: orchestration on top of storage
//! - `config`: paths and user settings
//! - `cli` / `display`: the command-line front end
//!
//! # Example
//!
//! ```rust,ignore
//! use splitledger::ledger::{compute_splits, SplitStrategy};
//! use splitledger::models::{MemberId, Money};
//!
//! let members = vec![MemberId::new("a@x.io"), MemberId::new("b@x.io")];
//! let strategy = SplitStrategy::from_tag("equal", &[])?;
//! let splits = compute_splits(&strategy, &members, Money::from_cents(1000))?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
