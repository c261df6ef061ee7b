//! Balance service
//!
//! Balances are never stored; each query folds the group's full history.

use crate::error::LedgerResult;
use crate::ledger;
use crate::models::{BalanceSummary, GroupBalances, GroupId, MemberId};
use crate::storage::Storage;

use super::group::GroupService;

/// Service for balance queries
pub struct BalanceService<'a> {
    storage: &'a Storage,
}

impl<'a> BalanceService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Net balance of every member of a group
    pub fn group_balances(&self, group_id: GroupId) -> LedgerResult<GroupBalances> {
        let group = GroupService::new(self.storage).get(group_id)?;
        let history = self.storage.expenses.get_by_group(group.id)?;
        Ok(ledger::compute_balances(&group, &history))
    }

    /// What `viewer` is owed and owes across every group they belong to
    pub fn summary_for(&self, viewer: &str) -> LedgerResult<BalanceSummary> {
        let viewer = MemberId::new(viewer);
        let groups = GroupService::new(self.storage).list_for_member(viewer.as_str())?;

        let mut balances = Vec::with_capacity(groups.len());
        for group in &groups {
            let history = self.storage.expenses.get_by_group(group.id)?;
            balances.push(ledger::compute_balances(group, &history));
        }

        Ok(BalanceSummary::for_viewer(&viewer, &balances))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::ledger::{ExpenseRequest, SettlementRequest};
    use crate::models::Money;
    use crate::services::expense::{CreateExpenseInput, ExpenseService, SettlementInput};
    use crate::services::group::CreateGroupInput;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn group(storage: &Storage, name: &str, owner: &str, members: &[&str]) -> GroupId {
        GroupService::new(storage)
            .create(CreateGroupInput {
                name: name.into(),
                owner_email: owner.into(),
                members: members.iter().map(|m| m.to_string()).collect(),
                ..CreateGroupInput::default()
            })
            .unwrap()
            .id
    }

    fn spend(storage: &Storage, group_id: GroupId, payer: &str, amount: f64) {
        ExpenseService::new(storage)
            .create(
                CreateExpenseInput {
                    group_id,
                    request: ExpenseRequest {
                        title: "Spend".into(),
                        amount,
                        ..ExpenseRequest::default()
                    },
                },
                &MemberId::new(payer),
            )
            .unwrap();
    }

    #[test]
    fn test_group_balances_follow_history() {
        let (_temp_dir, storage) = create_test_storage();
        let flat = group(&storage, "Flat", "a@x.io", &["b@x.io"]);
        let service = BalanceService::new(&storage);

        assert!(service.group_balances(flat).unwrap().net().is_zero());

        spend(&storage, flat, "a@x.io", 50.0);
        let view = service.group_balances(flat).unwrap();
        assert_eq!(view.balance_of("b@x.io"), Money::from_cents(-2500));

        ExpenseService::new(&storage)
            .record_settlement(SettlementInput {
                group_id: flat,
                request: SettlementRequest {
                    from: Some("b@x.io".into()),
                    to: Some("a@x.io".into()),
                    amount: Some(25.0),
                    ..SettlementRequest::default()
                },
            })
            .unwrap();
        let view = service.group_balances(flat).unwrap();
        assert!(view.balances.iter().all(|b| b.balance.is_zero()));
    }

    #[test]
    fn test_missing_group() {
        let (_temp_dir, storage) = create_test_storage();
        let err = BalanceService::new(&storage)
            .group_balances(GroupId::new())
            .unwrap_err();
        assert_eq!(err.kind(), "GroupNotFound");
    }

    #[test]
    fn test_summary_covers_only_viewer_groups() {
        let (_temp_dir, storage) = create_test_storage();
        let flat = group(&storage, "Flat", "a@x.io", &["b@x.io"]);
        let trip = group(&storage, "Trip", "b@x.io", &["a@x.io", "c@x.io"]);
        let other = group(&storage, "Other", "z@x.io", &["y@x.io"]);

        spend(&storage, flat, "a@x.io", 20.0);
        spend(&storage, trip, "c@x.io", 30.0);
        spend(&storage, other, "z@x.io", 99.0);

        let summary = BalanceService::new(&storage).summary_for("A@x.io").unwrap();
        assert_eq!(summary.groups.len(), 2);
        assert_eq!(summary.total_owed_to_you, Money::from_cents(1000));
        assert_eq!(summary.total_you_owe, Money::from_cents(1000));
    }
}
