//! Payment status tracking
//!
//! Applies per-member payment updates to an expense's splits and recomputes
//! the expense's aggregate status.

use chrono::Utc;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, MemberId, SplitStatus};

/// A payment update for one member's split
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentUpdate {
    pub member: String,
    /// New status; unchanged when absent
    pub status: Option<SplitStatus>,
    pub proof_image: Option<String>,
    pub notes: Option<String>,
}

impl PaymentUpdate {
    pub fn status(member: impl Into<String>, status: SplitStatus) -> Self {
        Self {
            member: member.into(),
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Apply payment updates to `expense`
///
/// Updates naming a member without a split are ignored. Clients working from
/// stale state may still reference people dropped from the expense, so this is
/// kept lenient rather than reported as an error. If no update matches, the
/// expense comes back untouched.
///
/// Statuses only move forward. Every update is checked before any is applied,
/// so a rejected batch leaves the expense as it was.
pub fn apply_payments(mut expense: Expense, updates: &[PaymentUpdate]) -> LedgerResult<Expense> {
    let mut matched = Vec::with_capacity(updates.len());
    for update in updates {
        let member = MemberId::new(&update.member);
        let Some(index) = expense.splits.iter().position(|s| s.member == member) else {
            tracing::debug!(
                expense = %expense.id,
                member = %member,
                "Ignoring payment update for member without a split"
            );
            continue;
        };

        if let Some(next) = update.status {
            let current = expense.splits[index].status;
            if !current.can_transition_to(next) {
                return Err(LedgerError::InvalidTransition {
                    member: member.to_string(),
                    from: current.to_string(),
                    to: next.to_string(),
                });
            }
        }
        matched.push((index, update));
    }

    if matched.is_empty() {
        return Ok(expense);
    }

    for (index, update) in matched {
        let split = &mut expense.splits[index];
        if let Some(status) = update.status {
            split.status = status;
        }
        if let Some(proof) = update.proof_image.as_ref().filter(|p| !p.is_empty()) {
            split.proof_image = Some(proof.clone());
        }
        if let Some(notes) = update.notes.as_ref().filter(|n| !n.is_empty()) {
            split.notes = Some(notes.clone());
        }
    }

    expense.refresh_status();
    expense.updated_at = Utc::now();
    Ok(expense)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseStatus, GroupId, Money, Split, SplitMethod};

    fn two_way_expense() -> Expense {
        Expense::new(
            GroupId::new(),
            "Concert",
            Money::from_cents(8000),
            "USD",
            MemberId::new("a@x.io"),
            SplitMethod::Equal,
            vec![
                Split::new(MemberId::new("a@x.io"), Money::from_cents(4000)),
                Split::new(MemberId::new("b@x.io"), Money::from_cents(4000)),
            ],
        )
    }

    #[test]
    fn test_partial_then_settled() {
        let expense = two_way_expense();
        let expense =
            apply_payments(expense, &[PaymentUpdate::status("a@x.io", SplitStatus::Paid)]).unwrap();
        assert_eq!(expense.status, ExpenseStatus::Partial);

        let expense =
            apply_payments(expense, &[PaymentUpdate::status("B@x.io", SplitStatus::Verified)])
                .unwrap();
        assert_eq!(expense.status, ExpenseStatus::Settled);
        assert_eq!(expense.splits[1].status, SplitStatus::Verified);
    }

    #[test]
    fn test_unknown_member_is_a_no_op() {
        let expense = two_way_expense();
        let updated = apply_payments(
            expense.clone(),
            &[PaymentUpdate::status("mallory@x.io", SplitStatus::Paid)],
        )
        .unwrap();
        assert_eq!(updated, expense);
    }

    #[test]
    fn test_backward_transition_rejects_whole_batch() {
        let expense = apply_payments(
            two_way_expense(),
            &[PaymentUpdate::status("a@x.io", SplitStatus::Verified)],
        )
        .unwrap();

        let err = apply_payments(
            expense.clone(),
            &[
                PaymentUpdate::status("b@x.io", SplitStatus::Paid),
                PaymentUpdate::status("a@x.io", SplitStatus::Unpaid),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTransition { ref member, .. } if member == "a@x.io"));
        assert_eq!(expense.splits[1].status, SplitStatus::Unpaid);
    }

    #[test]
    fn test_notes_and_proof_without_status() {
        let expense = apply_payments(
            two_way_expense(),
            &[PaymentUpdate {
                member: "b@x.io".into(),
                status: None,
                proof_image: Some("receipts/b.png".into()),
                notes: Some("cash".into()),
            }],
        )
        .unwrap();
        let split = expense.split_for("b@x.io").unwrap();
        assert_eq!(split.status, SplitStatus::Unpaid);
        assert_eq!(split.proof_image.as_deref(), Some("receipts/b.png"));
        assert_eq!(split.notes.as_deref(), Some("cash"));
        assert_eq!(expense.status, ExpenseStatus::Pending);
    }
}
