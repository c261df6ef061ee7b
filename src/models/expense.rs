//! Expense model
//!
//! An expense is a shared cost raised by one payer and divided among members
//! through a list of splits. Settlements are stored as expenses too, with kind
//! `settlement` and a single split for the receiving member.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{ExpenseId, GroupId};
use super::member::MemberId;
use super::money::Money;
use crate::error::LedgerError;

/// Tag naming the strategy an expense was split with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    #[default]
    Equal,
    Percent,
    Shares,
    Exact,
    Settlement,
}

impl SplitMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Percent => "percent",
            Self::Shares => "shares",
            Self::Exact => "exact",
            Self::Settlement => "settlement",
        }
    }
}

impl FromStr for SplitMethod {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equal" => Ok(Self::Equal),
            "percent" => Ok(Self::Percent),
            "shares" => Ok(Self::Shares),
            "exact" => Ok(Self::Exact),
            "settlement" => Ok(Self::Settlement),
            other => Err(LedgerError::UnsupportedStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment state of a single split
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitStatus {
    #[default]
    Unpaid,
    /// Debtor reports having paid
    Paid,
    /// Payer confirmed receipt; terminal
    Verified,
}

impl SplitStatus {
    /// Paid or verified
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Paid | Self::Verified)
    }

    /// Status only moves forward: unpaid → paid → verified, with
    /// unpaid → verified allowed. Staying put is always allowed.
    pub fn can_transition_to(&self, next: SplitStatus) -> bool {
        next >= *self
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "unpaid" => Some(Self::Unpaid),
            "paid" => Some(Self::Paid),
            "verified" => Some(Self::Verified),
            _ => None,
        }
    }
}

impl fmt::Display for SplitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unpaid => write!(f, "unpaid"),
            Self::Paid => write!(f, "paid"),
            Self::Verified => write!(f, "verified"),
        }
    }
}

/// Aggregate status of an expense, derived from its splits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    /// No split has been paid yet
    #[default]
    Pending,
    /// Some but not all splits are paid or verified
    Partial,
    /// Every split is paid or verified
    Settled,
}

impl ExpenseStatus {
    /// Derive the aggregate status from split statuses
    ///
    /// Only split statuses count. Proof images and notes on unpaid splits
    /// leave the expense `Pending`, so a batch carrying only those does not
    /// make it `Partial`.
    pub fn from_splits(splits: &[Split]) -> Self {
        let settled = splits.iter().filter(|s| s.status.is_settled()).count();
        if settled == splits.len() {
            Self::Settled
        } else if settled > 0 {
            Self::Partial
        } else {
            Self::Pending
        }
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Partial => write!(f, "partial"),
            Self::Settled => write!(f, "settled"),
        }
    }
}

/// Whether a ledger entry is a shared cost or a debt payoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseKind {
    #[default]
    Expense,
    Settlement,
}

impl fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "expense"),
            Self::Settlement => write!(f, "settlement"),
        }
    }
}

/// One member's obligation within an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub member: MemberId,

    /// Amount owed, in cents
    pub amount: Money,

    /// Percent given for a percent split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,

    /// Share count given for a shares split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<f64>,

    #[serde(default)]
    pub status: SplitStatus,

    /// Proof of payment (URL or path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Split {
    /// Create an unpaid split
    pub fn new(member: MemberId, amount: Money) -> Self {
        Self {
            member,
            amount,
            percent: None,
            shares: None,
            status: SplitStatus::Unpaid,
            proof_image: None,
            notes: None,
        }
    }

    pub fn with_percent(mut self, percent: f64) -> Self {
        self.percent = Some(percent);
        self
    }

    pub fn with_shares(mut self, shares: f64) -> Self {
        self.shares = Some(shares);
        self
    }
}

/// A shared cost, or a settlement, recorded in a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    pub group_id: GroupId,

    pub title: String,

    /// Total amount (always positive)
    pub amount: Money,

    pub currency: String,

    /// Member who paid the total
    pub paid_by: MemberId,

    /// Members the expense is split between
    pub included_members: Vec<MemberId>,

    pub split_method: SplitMethod,

    pub splits: Vec<Split>,

    #[serde(default)]
    pub kind: ExpenseKind,

    #[serde(default)]
    pub status: ExpenseStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_image: Option<String>,

    /// Bumped on every stored modification
    #[serde(default)]
    pub version: u64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Assemble an expense from already-validated splits
    pub fn new(
        group_id: GroupId,
        title: impl Into<String>,
        amount: Money,
        currency: impl Into<String>,
        paid_by: MemberId,
        split_method: SplitMethod,
        splits: Vec<Split>,
    ) -> Self {
        let now = Utc::now();
        let included_members = splits.iter().map(|s| s.member.clone()).collect();
        let status = ExpenseStatus::from_splits(&splits);
        Self {
            id: ExpenseId::new(),
            group_id,
            title: title.into(),
            amount,
            currency: currency.into(),
            paid_by,
            included_members,
            split_method,
            splits,
            kind: ExpenseKind::Expense,
            status,
            notes: None,
            proof_image: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_settlement(&self) -> bool {
        self.kind == ExpenseKind::Settlement
    }

    /// Sum of all split amounts
    pub fn splits_total(&self) -> Money {
        self.splits.iter().map(|s| s.amount).sum()
    }

    /// Find the split for a member
    pub fn split_for(&self, member: &str) -> Option<&Split> {
        self.splits.iter().find(|s| s.member.as_str() == member)
    }

    /// Recompute the aggregate status from the splits
    pub fn refresh_status(&mut self) {
        self.status = ExpenseStatus::from_splits(&self.splits);
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} paid by {}",
            self.title,
            self.amount.format_with_currency(&self.currency),
            self.paid_by
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(member: &str, cents: i64, status: SplitStatus) -> Split {
        Split {
            status,
            ..Split::new(MemberId::new(member), Money::from_cents(cents))
        }
    }

    #[test]
    fn test_split_method_parse() {
        assert_eq!("Percent".parse::<SplitMethod>().unwrap(), SplitMethod::Percent);
        let err = "weighted".parse::<SplitMethod>().unwrap_err();
        assert!(matches!(err, LedgerError::UnsupportedStrategy(tag) if tag == "weighted"));
    }

    #[test]
    fn test_status_transitions() {
        assert!(SplitStatus::Unpaid.can_transition_to(SplitStatus::Paid));
        assert!(SplitStatus::Unpaid.can_transition_to(SplitStatus::Verified));
        assert!(SplitStatus::Paid.can_transition_to(SplitStatus::Verified));
        assert!(SplitStatus::Paid.can_transition_to(SplitStatus::Paid));
        assert!(!SplitStatus::Paid.can_transition_to(SplitStatus::Unpaid));
        assert!(!SplitStatus::Verified.can_transition_to(SplitStatus::Paid));
    }

    #[test]
    fn test_aggregate_status() {
        let pending = vec![
            split("a@x.io", 500, SplitStatus::Unpaid),
            split("b@x.io", 500, SplitStatus::Unpaid),
        ];
        assert_eq!(ExpenseStatus::from_splits(&pending), ExpenseStatus::Pending);

        let annotated = vec![
            Split {
                proof_image: Some("receipts/a.png".into()),
                notes: Some("cash".into()),
                ..split("a@x.io", 500, SplitStatus::Unpaid)
            },
            split("b@x.io", 500, SplitStatus::Unpaid),
        ];
        assert_eq!(ExpenseStatus::from_splits(&annotated), ExpenseStatus::Pending);

        let partial = vec![
            split("a@x.io", 500, SplitStatus::Paid),
            split("b@x.io", 500, SplitStatus::Unpaid),
        ];
        assert_eq!(ExpenseStatus::from_splits(&partial), ExpenseStatus::Partial);

        let settled = vec![
            split("a@x.io", 500, SplitStatus::Paid),
            split("b@x.io", 500, SplitStatus::Verified),
        ];
        assert_eq!(ExpenseStatus::from_splits(&settled), ExpenseStatus::Settled);
    }

    #[test]
    fn test_new_expense_derives_members_and_status() {
        let expense = Expense::new(
            GroupId::new(),
            "Dinner",
            Money::from_cents(1000),
            "USD",
            MemberId::new("a@x.io"),
            SplitMethod::Exact,
            vec![
                split("a@x.io", 600, SplitStatus::Unpaid),
                split("b@x.io", 400, SplitStatus::Unpaid),
            ],
        );
        assert_eq!(expense.included_members.len(), 2);
        assert_eq!(expense.status, ExpenseStatus::Pending);
        assert_eq!(expense.splits_total(), Money::from_cents(1000));
        assert_eq!(expense.split_for("b@x.io").unwrap().amount.cents(), 400);
        assert_eq!(expense.to_string(), "Dinner 10.00 USD paid by a@x.io");
    }

    #[test]
    fn test_serialization_uses_lowercase_tags() {
        let expense = Expense::new(
            GroupId::new(),
            "Taxi",
            Money::from_cents(900),
            "USD",
            MemberId::new("a@x.io"),
            SplitMethod::Equal,
            vec![split("a@x.io", 900, SplitStatus::Unpaid)],
        );
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["split_method"], "equal");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["splits"][0]["status"], "unpaid");

        let restored: Expense = serde_json::from_value(json).unwrap();
        assert_eq!(restored, expense);
    }
}
