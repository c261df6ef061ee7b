//! Split calculation
//!
//! Turns a total amount into per-member obligations. Each strategy is its own
//! type implementing [`SplitRule`]; [`SplitStrategy`] is the closed set of
//! them. All validation happens before any split is built, so callers either
//! get the complete list or an error.

use std::collections::HashSet;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{MemberId, Money, Split, SplitMethod};

/// Capability shared by every splitting strategy
pub trait SplitRule {
    /// Produce the splits of `total` among `members`
    ///
    /// `members` is non-empty and free of duplicates, and `total` is positive.
    /// [`compute_splits`] checks both before delegating here.
    fn compute(&self, members: &[MemberId], total: Money) -> LedgerResult<Vec<Split>>;
}

/// Each member owes `total / count`, rounded to the cent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EqualSplit;

/// Member percent of the total
#[derive(Debug, Clone, PartialEq)]
pub struct PercentShare {
    pub member: MemberId,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PercentSplit {
    pub entries: Vec<PercentShare>,
}

/// Member share count, weighted against the sum of all counts
#[derive(Debug, Clone, PartialEq)]
pub struct ShareCount {
    pub member: MemberId,
    pub shares: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharesSplit {
    pub entries: Vec<ShareCount>,
}

/// Member amount given as-is
#[derive(Debug, Clone, PartialEq)]
pub struct ExactAmount {
    pub member: MemberId,
    pub amount: Money,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExactSplit {
    pub entries: Vec<ExactAmount>,
}

/// A single payee receiving the whole amount (two-party payoff)
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementSplit {
    pub payee: MemberId,
    pub amount: Money,
}

/// The closed set of splitting strategies
#[derive(Debug, Clone, PartialEq)]
pub enum SplitStrategy {
    Equal(EqualSplit),
    Percent(PercentSplit),
    Shares(SharesSplit),
    Exact(ExactSplit),
    Settlement(SettlementSplit),
}

/// One raw strategy input row as it arrives from a request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyInput {
    pub member: String,
    pub percent: Option<f64>,
    pub shares: Option<f64>,
    pub amount: Option<f64>,
}

impl StrategyInput {
    pub fn percent(member: impl Into<String>, percent: f64) -> Self {
        Self {
            member: member.into(),
            percent: Some(percent),
            ..Self::default()
        }
    }

    pub fn shares(member: impl Into<String>, shares: f64) -> Self {
        Self {
            member: member.into(),
            shares: Some(shares),
            ..Self::default()
        }
    }

    pub fn amount(member: impl Into<String>, amount: f64) -> Self {
        Self {
            member: member.into(),
            amount: Some(amount),
            ..Self::default()
        }
    }
}

impl SplitStrategy {
    /// Build a strategy from a raw method tag and input rows
    ///
    /// Unknown tags fail with `UnsupportedStrategy`; rows missing the value
    /// their strategy needs fail with `InvalidSplit`. The equal strategy takes
    /// no inputs and ignores any that are given.
    pub fn from_tag(tag: &str, inputs: &[StrategyInput]) -> LedgerResult<Self> {
        let method: SplitMethod = tag.parse()?;
        Self::from_parts(method, inputs)
    }

    /// Build a strategy for an already-parsed method
    pub fn from_parts(method: SplitMethod, inputs: &[StrategyInput]) -> LedgerResult<Self> {
        let strategy = match method {
            SplitMethod::Equal => Self::Equal(EqualSplit),
            SplitMethod::Percent => {
                let entries = inputs
                    .iter()
                    .map(|input| match (input_member(input), input.percent) {
                        (Some(member), Some(percent)) => Ok(PercentShare { member, percent }),
                        _ => Err(LedgerError::InvalidSplit(
                            "Percent split requires member and percent.".into(),
                        )),
                    })
                    .collect::<LedgerResult<Vec<_>>>()?;
                Self::Percent(PercentSplit { entries })
            }
            SplitMethod::Shares => {
                let entries = inputs
                    .iter()
                    .map(|input| match (input_member(input), input.shares) {
                        (Some(member), Some(shares)) => Ok(ShareCount { member, shares }),
                        _ => Err(LedgerError::InvalidSplit(
                            "Share split requires member and shares count.".into(),
                        )),
                    })
                    .collect::<LedgerResult<Vec<_>>>()?;
                Self::Shares(SharesSplit { entries })
            }
            SplitMethod::Exact => {
                let entries = inputs
                    .iter()
                    .map(|input| {
                        match (input_member(input), input.amount.and_then(Money::from_decimal)) {
                            (Some(member), Some(amount)) => Ok(ExactAmount { member, amount }),
                            _ => Err(LedgerError::InvalidSplit(
                                "Exact split requires member and amount.".into(),
                            )),
                        }
                    })
                    .collect::<LedgerResult<Vec<_>>>()?;
                Self::Exact(ExactSplit { entries })
            }
            SplitMethod::Settlement => match inputs {
                [input] => match (input_member(input), input.amount.and_then(Money::from_decimal)) {
                    (Some(payee), Some(amount)) => Self::Settlement(SettlementSplit { payee, amount }),
                    _ => {
                        return Err(LedgerError::InvalidSplit(
                            "Settlement split requires payee and amount.".into(),
                        ))
                    }
                },
                _ => {
                    return Err(LedgerError::InvalidSplit(
                        "Settlement split takes exactly one payee.".into(),
                    ))
                }
            },
        };
        Ok(strategy)
    }

    /// The method tag recorded on the expense
    pub fn method(&self) -> SplitMethod {
        match self {
            Self::Equal(_) => SplitMethod::Equal,
            Self::Percent(_) => SplitMethod::Percent,
            Self::Shares(_) => SplitMethod::Shares,
            Self::Exact(_) => SplitMethod::Exact,
            Self::Settlement(_) => SplitMethod::Settlement,
        }
    }
}

impl SplitRule for SplitStrategy {
    fn compute(&self, members: &[MemberId], total: Money) -> LedgerResult<Vec<Split>> {
        match self {
            Self::Equal(rule) => rule.compute(members, total),
            Self::Percent(rule) => rule.compute(members, total),
            Self::Shares(rule) => rule.compute(members, total),
            Self::Exact(rule) => rule.compute(members, total),
            Self::Settlement(rule) => rule.compute(members, total),
        }
    }
}

/// Compute the splits of `total` among `members` under `strategy`
///
/// `members` is normalized and deduplicated (first occurrence wins) before the
/// strategy runs.
pub fn compute_splits(
    strategy: &SplitStrategy,
    members: &[MemberId],
    total: Money,
) -> LedgerResult<Vec<Split>> {
    let members = dedup_members(members);
    if members.is_empty() {
        return Err(LedgerError::InvalidSplit(
            "At least one member must be selected for the split.".into(),
        ));
    }
    if !total.is_positive() {
        return Err(LedgerError::InvalidAmount(format!(
            "Amount must be greater than zero, got {}",
            total
        )));
    }

    let splits = strategy.compute(&members, total)?;

    tracing::debug!(
        method = %strategy.method(),
        members = members.len(),
        total = %total,
        allocated = %splits.iter().map(|s| s.amount).sum::<Money>(),
        "Computed splits"
    );

    Ok(splits)
}

impl SplitRule for EqualSplit {
    fn compute(&self, members: &[MemberId], total: Money) -> LedgerResult<Vec<Split>> {
        let each = total.divide_evenly(members.len());
        Ok(members
            .iter()
            .map(|member| Split::new(member.clone(), each))
            .collect())
    }
}

impl SplitRule for PercentSplit {
    fn compute(&self, members: &[MemberId], total: Money) -> LedgerResult<Vec<Split>> {
        let mut sum = 0.0;
        for entry in &self.entries {
            if !entry.percent.is_finite() || entry.percent < 0.0 {
                return Err(LedgerError::InvalidSplit(format!(
                    "Percent for {} must be a non-negative number.",
                    entry.member
                )));
            }
            sum += entry.percent;
        }
        ensure_unique(self.entries.iter().map(|e| &e.member))?;
        if sum.round() as i64 != 100 {
            return Err(LedgerError::InvalidSplit(format!(
                "Percent splits must add up to 100% (got {}%).",
                sum
            )));
        }
        ensure_included(self.entries.iter().map(|e| &e.member), members)?;

        Ok(self
            .entries
            .iter()
            .map(|entry| {
                Split::new(entry.member.clone(), total.portion(entry.percent, 100.0))
                    .with_percent(entry.percent)
            })
            .collect())
    }
}

impl SplitRule for SharesSplit {
    fn compute(&self, members: &[MemberId], total: Money) -> LedgerResult<Vec<Split>> {
        let mut total_shares = 0.0;
        for entry in &self.entries {
            if !entry.shares.is_finite() || entry.shares < 0.0 {
                return Err(LedgerError::InvalidSplit(format!(
                    "Shares for {} must be a non-negative number.",
                    entry.member
                )));
            }
            total_shares += entry.shares;
        }
        ensure_unique(self.entries.iter().map(|e| &e.member))?;
        if total_shares == 0.0 {
            return Err(LedgerError::InvalidSplit(
                "Share splits must have at least one share.".into(),
            ));
        }
        ensure_included(self.entries.iter().map(|e| &e.member), members)?;

        Ok(self
            .entries
            .iter()
            .map(|entry| {
                Split::new(entry.member.clone(), total.portion(entry.shares, total_shares))
                    .with_shares(entry.shares)
            })
            .collect())
    }
}

impl SplitRule for ExactSplit {
    fn compute(&self, members: &[MemberId], total: Money) -> LedgerResult<Vec<Split>> {
        if let Some(entry) = self.entries.iter().find(|e| e.amount.is_negative()) {
            return Err(LedgerError::InvalidSplit(format!(
                "Amount for {} cannot be negative ({}).",
                entry.member, entry.amount
            )));
        }
        ensure_unique(self.entries.iter().map(|e| &e.member))?;
        let sum: Money = self.entries.iter().map(|e| e.amount).sum();
        if sum != total {
            return Err(LedgerError::InvalidSplit(format!(
                "Exact splits must add up to the total amount ({} != {}).",
                sum, total
            )));
        }
        ensure_included(self.entries.iter().map(|e| &e.member), members)?;

        Ok(self
            .entries
            .iter()
            .map(|entry| Split::new(entry.member.clone(), entry.amount))
            .collect())
    }
}

impl SplitRule for SettlementSplit {
    fn compute(&self, members: &[MemberId], total: Money) -> LedgerResult<Vec<Split>> {
        if self.amount != total {
            return Err(LedgerError::InvalidSplit(format!(
                "Settlement amount {} does not match the total {}.",
                self.amount, total
            )));
        }
        ensure_included(std::iter::once(&self.payee), members)?;
        Ok(vec![Split::new(self.payee.clone(), self.amount)])
    }
}

fn input_member(input: &StrategyInput) -> Option<MemberId> {
    MemberId::from_optional(Some(input.member.as_str()))
}

fn dedup_members(members: &[MemberId]) -> Vec<MemberId> {
    let mut seen = HashSet::new();
    members
        .iter()
        .filter(|m| !m.is_empty() && seen.insert(m.as_str()))
        .cloned()
        .collect()
}

fn ensure_unique<'a>(ids: impl Iterator<Item = &'a MemberId>) -> LedgerResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(LedgerError::InvalidSplit(format!(
                "Member {} is listed more than once.",
                id
            )));
        }
    }
    Ok(())
}

fn ensure_included<'a>(
    ids: impl Iterator<Item = &'a MemberId>,
    members: &[MemberId],
) -> LedgerResult<()> {
    let included: HashSet<&str> = members.iter().map(MemberId::as_str).collect();
    for id in ids {
        if !included.contains(id.as_str()) {
            return Err(LedgerError::unknown_member(id.as_str()));
        }
    }
    Ok(())
}
