//! Balance aggregation
//!
//! Folds a group's full expense and settlement history into a net balance per
//! member. The fold only adds and subtracts, so the result does not depend on
//! the order of the entries.

use std::collections::{BTreeMap, HashMap};

use crate::models::{
    BalanceSummary, Expense, Group, GroupBalances, GroupPosition, MemberBalance, MemberId, Money,
};

/// Compute every member's net balance from the group's ledger entries
///
/// The payer of each entry is credited with its total and every split member
/// is debited with their split. People who appear in the history but are no
/// longer on the roster are tracked too, after the roster, sorted by email.
/// Entries that belong to another group are skipped.
pub fn compute_balances(group: &Group, entries: &[Expense]) -> GroupBalances {
    let mut roster: HashMap<&str, Money> = group
        .members
        .ids()
        .map(|id| (id.as_str(), Money::zero()))
        .collect();
    let mut historical: BTreeMap<&str, Money> = BTreeMap::new();

    for entry in entries {
        if entry.group_id != group.id {
            tracing::warn!(
                expense = %entry.id,
                group = %group.id,
                "Skipping ledger entry from another group"
            );
            continue;
        }

        post(&mut roster, &mut historical, entry.paid_by.as_str(), entry.amount);
        for split in &entry.splits {
            post(&mut roster, &mut historical, split.member.as_str(), -split.amount);
        }
    }

    let mut balances: Vec<MemberBalance> = group
        .members
        .ids()
        .map(|id| MemberBalance {
            member: id.clone(),
            balance: roster[id.as_str()],
            in_roster: true,
        })
        .collect();
    balances.extend(historical.into_iter().map(|(id, balance)| MemberBalance {
        member: MemberId::new(id),
        balance,
        in_roster: false,
    }));

    GroupBalances {
        group_id: group.id,
        group_name: group.name.clone(),
        currency: group.currency().to_string(),
        balances,
    }
}

fn post<'a>(
    roster: &mut HashMap<&'a str, Money>,
    historical: &mut BTreeMap<&'a str, Money>,
    member: &'a str,
    delta: Money,
) {
    match roster.get_mut(member) {
        Some(balance) => *balance += delta,
        None => *historical.entry(member).or_default() += delta,
    }
}

impl BalanceSummary {
    /// Project per-group balances onto one viewer
    ///
    /// A positive balance in a group counts as owed to the viewer, a negative
    /// one as owed by the viewer. Groups the viewer never appears in show zero
    /// on both sides.
    pub fn for_viewer(viewer: &MemberId, groups: &[GroupBalances]) -> Self {
        let mut total_owed_to_you = Money::zero();
        let mut total_you_owe = Money::zero();

        let positions = groups
            .iter()
            .map(|group| {
                let balance = group.balance_of(viewer.as_str());
                let (owed_to_you, you_owe) = if balance.is_positive() {
                    (balance, Money::zero())
                } else {
                    (Money::zero(), balance.abs())
                };
                total_owed_to_you += owed_to_you;
                total_you_owe += you_owe;
                GroupPosition {
                    group_id: group.group_id,
                    group_name: group.group_name.clone(),
                    currency: group.currency.clone(),
                    owed_to_you,
                    you_owe,
                }
            })
            .collect();

        Self {
            viewer: viewer.clone(),
            total_owed_to_you,
            total_you_owe,
            groups: positions,
        }
    }
}
