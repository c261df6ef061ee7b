//! Expense creation
//!
//! Resolves who an expense is split between, runs the split calculator and
//! assembles the record. Nothing here touches storage.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, Group, MemberId, Money, SplitMethod};

use super::splits::{compute_splits, SplitStrategy, StrategyInput};

/// A request to raise an expense in a group
#[derive(Debug, Clone, Default)]
pub struct ExpenseRequest {
    pub title: String,

    /// Total as a decimal, e.g. `42.5`
    pub amount: f64,

    /// Payer email; the requester when absent
    pub paid_by: Option<String>,

    /// Strategy tag (`equal`, `percent`, `shares`, `exact`); `equal` when absent
    pub split_method: Option<String>,

    /// Members to split between; the whole roster when empty
    pub included_members: Vec<String>,

    pub inputs: Vec<StrategyInput>,

    /// Currency code; the group currency when absent
    pub currency: Option<String>,

    pub notes: Option<String>,

    pub proof_image: Option<String>,
}

/// Build a validated expense for `group`, raised by `requester`
pub fn create_expense(
    group: &Group,
    requester: &MemberId,
    request: ExpenseRequest,
) -> LedgerResult<Expense> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(LedgerError::Validation("Expense title is required.".into()));
    }

    let amount = Money::from_decimal(request.amount).ok_or_else(|| {
        LedgerError::InvalidAmount(format!(
            "Amount must be a finite number no larger than {}, got {}",
            Money::MAX,
            request.amount
        ))
    })?;

    let method: SplitMethod = request
        .split_method
        .as_deref()
        .map(str::parse::<SplitMethod>)
        .transpose()?
        .unwrap_or_default();
    if method == SplitMethod::Settlement {
        return Err(LedgerError::UnsupportedStrategy(
            "settlement splits are recorded as settlements, not expenses".into(),
        ));
    }

    let paid_by = MemberId::from_optional(request.paid_by.as_deref())
        .unwrap_or_else(|| requester.clone());
    if !group.is_member(paid_by.as_str()) {
        return Err(LedgerError::unknown_member(paid_by.as_str()));
    }

    let included: Vec<MemberId> = if request.included_members.is_empty() {
        group.members.ids().cloned().collect()
    } else {
        request.included_members.iter().map(MemberId::new).collect()
    };
    if let Some(outsider) = included.iter().find(|m| !group.is_member(m.as_str())) {
        return Err(LedgerError::unknown_member(outsider.as_str()));
    }

    let strategy = SplitStrategy::from_parts(method, &request.inputs)?;
    let splits = compute_splits(&strategy, &included, amount)?;

    let currency = request
        .currency
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| group.currency().to_string());

    let mut expense = Expense::new(group.id, title, amount, currency, paid_by, method, splits);
    let mut seen = std::collections::HashSet::new();
    expense.included_members = included
        .into_iter()
        .filter(|m| seen.insert(m.clone()))
        .collect();
    expense.notes = request.notes;
    expense.proof_image = request.proof_image;

    Ok(expense)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseStatus, Member};

    fn group() -> Group {
        Group::new(
            "Flat",
            Member::owner("a@x.io", None),
            vec![Member::new("b@x.io", None), Member::new("c@x.io", None)],
        )
    }

    fn request(amount: f64) -> ExpenseRequest {
        ExpenseRequest {
            title: "Groceries".into(),
            amount,
            ..ExpenseRequest::default()
        }
    }

    #[test]
    fn test_defaults_to_equal_split_over_roster() {
        let group = group();
        let expense = create_expense(&group, &MemberId::new("b@x.io"), request(10.0)).unwrap();

        assert_eq!(expense.paid_by.as_str(), "b@x.io");
        assert_eq!(expense.split_method, SplitMethod::Equal);
        assert_eq!(expense.included_members.len(), 3);
        assert_eq!(expense.currency, "USD");
        assert_eq!(expense.status, ExpenseStatus::Pending);
        assert!(expense.splits.iter().all(|s| s.amount.cents() == 333));
    }

    #[test]
    fn test_included_members_subset_and_payer_override() {
        let group = group();
        let expense = create_expense(
            &group,
            &MemberId::new("a@x.io"),
            ExpenseRequest {
                paid_by: Some("C@x.io".into()),
                included_members: vec!["a@x.io".into(), "b@x.io".into()],
                currency: Some("eur".into()),
                ..request(20.0)
            },
        )
        .unwrap();

        assert_eq!(expense.paid_by.as_str(), "c@x.io");
        assert_eq!(expense.splits.len(), 2);
        assert_eq!(expense.currency, "EUR");
    }

    #[test]
    fn test_included_member_outside_group() {
        let group = group();
        let err = create_expense(
            &group,
            &MemberId::new("a@x.io"),
            ExpenseRequest {
                included_members: vec!["a@x.io".into(), "eve@x.io".into()],
                ..request(20.0)
            },
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::UnknownMember { member } if member == "eve@x.io"));
    }

    #[test]
    fn test_percent_inputs_must_be_included() {
        let group = group();
        let err = create_expense(
            &group,
            &MemberId::new("a@x.io"),
            ExpenseRequest {
                split_method: Some("percent".into()),
                included_members: vec!["a@x.io".into(), "b@x.io".into()],
                inputs: vec![
                    StrategyInput::percent("a@x.io", 50.0),
                    StrategyInput::percent("c@x.io", 50.0),
                ],
                ..request(20.0)
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), "UnknownMember");
    }

    #[test]
    fn test_rejects_bad_input() {
        let group = group();
        let requester = MemberId::new("a@x.io");

        let err = create_expense(&group, &requester, request(f64::NAN)).unwrap_err();
        assert_eq!(err.kind(), "InvalidAmount");

        let err = create_expense(&group, &requester, request(-4.0)).unwrap_err();
        assert_eq!(err.kind(), "InvalidAmount");

        let err = create_expense(&group, &requester, request(9.0e16)).unwrap_err();
        assert_eq!(err.kind(), "InvalidAmount");

        let err = create_expense(
            &group,
            &requester,
            ExpenseRequest {
                title: "  ".into(),
                ..request(4.0)
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), "Validation");

        for tag in ["settlement", "lottery"] {
            let err = create_expense(
                &group,
                &requester,
                ExpenseRequest {
                    split_method: Some(tag.into()),
                    ..request(4.0)
                },
            )
            .unwrap_err();
            assert_eq!(err.kind(), "UnsupportedStrategy");
        }
    }
}
