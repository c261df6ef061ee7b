//! Core data models for splitledger
//!
//! Plain records describing groups, their members, expenses with their
//! splits, and the derived balance views.

pub mod balance;
pub mod expense;
pub mod group;
pub mod ids;
pub mod member;
pub mod money;

pub use balance::{BalanceSummary, BalanceTotals, GroupBalances, GroupPosition, MemberBalance};
pub use expense::{Expense, ExpenseKind, ExpenseStatus, Split, SplitMethod, SplitStatus};
pub use group::{Group, GroupCategory, GroupSettings, MemberRoster};
pub use ids::{ExpenseId, GroupId};
pub use member::{Member, MemberId, MemberRole};
pub use money::{Money, MoneyParseError};
