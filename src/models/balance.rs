//! Balance views
//!
//! Balances are derived from a group's history on every read and are never
//! stored. A positive balance means the group owes the member; a negative
//! balance means the member owes the group.

use serde::{Deserialize, Serialize};

use super::ids::GroupId;
use super::member::MemberId;
use super::money::Money;

/// Net position of one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub member: MemberId,

    pub balance: Money,

    /// False for people who appear in the history but have left the roster
    pub in_roster: bool,
}

impl MemberBalance {
    pub fn is_creditor(&self) -> bool {
        self.balance.is_positive()
    }

    pub fn is_debtor(&self) -> bool {
        self.balance.is_negative()
    }
}

/// Group-wide credit and debit sums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceTotals {
    /// Sum of positive balances
    pub owed_to_members: Money,
    /// Sum of negative balances, as a positive amount
    pub owed_by_members: Money,
}

impl BalanceTotals {
    /// Credits minus debits; zero for a consistent ledger up to rounding slack
    pub fn net(&self) -> Money {
        self.owed_to_members - self.owed_by_members
    }
}

/// Per-member balances of one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBalances {
    pub group_id: GroupId,

    pub group_name: String,

    pub currency: String,

    pub balances: Vec<MemberBalance>,
}

impl GroupBalances {
    /// Balance of one member, zero if they never appear
    pub fn balance_of(&self, member: &str) -> Money {
        self.balances
            .iter()
            .find(|b| b.member.as_str() == member)
            .map(|b| b.balance)
            .unwrap_or_default()
    }

    /// Sum of all balances
    pub fn net(&self) -> Money {
        self.balances.iter().map(|b| b.balance).sum()
    }

    pub fn totals(&self) -> BalanceTotals {
        let mut totals = BalanceTotals::default();
        for entry in &self.balances {
            if entry.balance.is_positive() {
                totals.owed_to_members += entry.balance;
            } else {
                totals.owed_by_members += entry.balance.abs();
            }
        }
        totals
    }
}

/// The viewer's position in one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPosition {
    pub group_id: GroupId,
    pub group_name: String,
    pub currency: String,
    pub owed_to_you: Money,
    pub you_owe: Money,
}

/// Viewer-relative roll-up across groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub viewer: MemberId,
    pub total_owed_to_you: Money,
    pub total_you_owe: Money,
    pub groups: Vec<GroupPosition>,
}
