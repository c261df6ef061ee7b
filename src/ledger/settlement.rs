//! Settlement recording
//!
//! A settlement is a direct payoff between two members, stored as an expense
//! of kind `settlement` with one split for the receiving member. The payer is
//! credited and the receiver debited, which moves both balances toward zero
//! when a debtor pays a creditor.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, ExpenseKind, Group, MemberId, Money, SplitStatus};

use super::splits::{compute_splits, SettlementSplit, SplitStrategy};

/// A request to record a payoff from one member to another
#[derive(Debug, Clone, Default)]
pub struct SettlementRequest {
    /// Member paying off their debt
    pub from: Option<String>,
    /// Member receiving the payment
    pub to: Option<String>,
    pub amount: Option<f64>,
    pub notes: Option<String>,
    pub proof_image: Option<String>,
}

/// Build a settlement record for `group`
pub fn record_settlement(group: &Group, request: SettlementRequest) -> LedgerResult<Expense> {
    let (from, to, amount) = match (
        MemberId::from_optional(request.from.as_deref()),
        MemberId::from_optional(request.to.as_deref()),
        request.amount.and_then(Money::from_decimal),
    ) {
        (Some(from), Some(to), Some(amount)) if amount.is_positive() => (from, to, amount),
        _ => {
            return Err(LedgerError::InvalidSettlement(
                "From, to, and a positive amount are required for settlement.".into(),
            ))
        }
    };
    if from == to {
        return Err(LedgerError::InvalidSettlement(format!(
            "{} cannot settle with themselves.",
            from
        )));
    }
    for member in [&from, &to] {
        if !group.is_member(member.as_str()) {
            return Err(LedgerError::unknown_member(member.as_str()));
        }
    }

    let strategy = SplitStrategy::Settlement(SettlementSplit {
        payee: to.clone(),
        amount,
    });
    let mut splits = compute_splits(&strategy, std::slice::from_ref(&to), amount)?;
    for split in &mut splits {
        split.status = SplitStatus::Paid;
    }

    let title = format!("Settlement from {} to {}", from, to);
    let mut expense = Expense::new(
        group.id,
        title,
        amount,
        group.currency(),
        from,
        strategy.method(),
        splits,
    );
    expense.kind = ExpenseKind::Settlement;
    expense.notes = request.notes;
    expense.proof_image = request.proof_image;

    Ok(expense)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::balances::compute_balances;
    use crate::ledger::expense::{create_expense, ExpenseRequest};
    use crate::models::{ExpenseStatus, Member, SplitMethod};

    fn group() -> Group {
        Group::new(
            "Trip",
            Member::owner("a@x.io", None),
            vec![Member::new("b@x.io", None)],
        )
    }

    fn settle(from: &str, to: &str, amount: f64) -> SettlementRequest {
        SettlementRequest {
            from: Some(from.into()),
            to: Some(to.into()),
            amount: Some(amount),
            ..SettlementRequest::default()
        }
    }

    #[test]
    fn test_settlement_record_shape() {
        let group = group();
        let expense = record_settlement(&group, settle("A@x.io", "b@x.io", 25.0)).unwrap();

        assert_eq!(expense.kind, ExpenseKind::Settlement);
        assert_eq!(expense.split_method, SplitMethod::Settlement);
        assert_eq!(expense.status, ExpenseStatus::Settled);
        assert_eq!(expense.paid_by.as_str(), "a@x.io");
        assert_eq!(expense.splits.len(), 1);
        assert_eq!(expense.splits[0].member.as_str(), "b@x.io");
        assert_eq!(expense.splits[0].amount.cents(), 2500);
        assert_eq!(expense.title, "Settlement from a@x.io to b@x.io");
        assert_eq!(expense.included_members, vec![MemberId::new("b@x.io")]);
    }

    #[test]
    fn test_settlement_validation() {
        let group = group();
        let cases = [
            SettlementRequest::default(),
            SettlementRequest {
                from: Some("a@x.io".into()),
                to: Some("  ".into()),
                amount: Some(5.0),
                ..SettlementRequest::default()
            },
            settle("a@x.io", "b@x.io", 0.0),
            settle("a@x.io", "b@x.io", -5.0),
            settle("a@x.io", "A@x.io", 5.0),
        ];
        for request in cases {
            let err = record_settlement(&group, request).unwrap_err();
            assert_eq!(err.kind(), "InvalidSettlement");
        }

        let err = record_settlement(&group, settle("a@x.io", "z@x.io", 5.0)).unwrap_err();
        assert_eq!(err.kind(), "UnknownMember");
    }

    #[test]
    fn test_recording_twice_doubles_the_effect() {
        let group = group();
        let dinner = create_expense(
            &group,
            &MemberId::new("b@x.io"),
            ExpenseRequest {
                title: "Dinner".into(),
                amount: 100.0,
                ..ExpenseRequest::default()
            },
        )
        .unwrap();
        let before = compute_balances(&group, std::slice::from_ref(&dinner));
        assert_eq!(before.balance_of("a@x.io").cents(), -5000);

        let payoff = record_settlement(&group, settle("a@x.io", "b@x.io", 25.0)).unwrap();
        let once = compute_balances(&group, &[dinner.clone(), payoff.clone()]);
        assert_eq!(once.balance_of("a@x.io").cents(), -2500);
        assert_eq!(once.balance_of("b@x.io").cents(), 2500);

        // Re-aggregating the same history is idempotent
        assert_eq!(compute_balances(&group, &[dinner.clone(), payoff.clone()]), once);

        let again = record_settlement(&group, settle("a@x.io", "b@x.io", 25.0)).unwrap();
        let twice = compute_balances(&group, &[dinner, payoff, again]);
        assert!(twice.balance_of("a@x.io").is_zero());
        assert!(twice.balance_of("b@x.io").is_zero());
    }
}
