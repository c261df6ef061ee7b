//! Expense service
//!
//! Persists expenses, settlements and payment updates produced by the ledger
//! engine. Payment updates use optimistic concurrency: each attempt reads the
//! current version and writes only if nobody else has written in between.

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{self, ExpenseRequest, PaymentUpdate, SettlementRequest};
use crate::models::{Expense, ExpenseId, GroupId, MemberId};
use crate::storage::Storage;

use super::group::GroupService;

const DEFAULT_PAYMENT_ATTEMPTS: u32 = 3;

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
    payment_attempts: u32,
}

/// Input for creating an expense in a group
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    pub group_id: GroupId,
    pub request: ExpenseRequest,
}

/// Input for recording a settlement in a group
#[derive(Debug, Clone)]
pub struct SettlementInput {
    pub group_id: GroupId,
    pub request: SettlementRequest,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            payment_attempts: DEFAULT_PAYMENT_ATTEMPTS,
        }
    }

    /// Bound the read-modify-write attempts of [`apply_payments`](Self::apply_payments)
    pub fn with_payment_attempts(mut self, attempts: u32) -> Self {
        self.payment_attempts = attempts.max(1);
        self
    }

    /// Create and store an expense raised by `requester`
    pub fn create(&self, input: CreateExpenseInput, requester: &MemberId) -> LedgerResult<Expense> {
        let group = GroupService::new(self.storage).get(input.group_id)?;
        let expense = ledger::create_expense(&group, requester, input.request)?;

        self.storage.expenses.insert(expense.clone())?;
        self.storage.expenses.save()?;

        tracing::info!(
            expense = %expense.id,
            group = %group.id,
            amount = %expense.amount,
            method = %expense.split_method,
            "Recorded expense"
        );
        Ok(expense)
    }

    /// Record a payoff between two group members
    pub fn record_settlement(&self, input: SettlementInput) -> LedgerResult<Expense> {
        let group = GroupService::new(self.storage).get(input.group_id)?;
        let settlement = ledger::record_settlement(&group, input.request)?;

        self.storage.expenses.insert(settlement.clone())?;
        self.storage.expenses.save()?;

        tracing::info!(
            expense = %settlement.id,
            group = %group.id,
            from = %settlement.paid_by,
            amount = %settlement.amount,
            "Recorded settlement"
        );
        Ok(settlement)
    }

    /// Apply payment updates to a stored expense
    ///
    /// Retries on version conflicts up to the configured number of attempts,
    /// then reports `Conflict`.
    pub fn apply_payments(
        &self,
        expense_id: ExpenseId,
        updates: &[PaymentUpdate],
    ) -> LedgerResult<Expense> {
        for attempt in 1..=self.payment_attempts {
            let current = self.get(expense_id)?;
            let expected = current.version;

            let updated = ledger::apply_payments(current.clone(), updates)?;
            if updated == current {
                tracing::debug!(expense = %expense_id, "No payment update matched a split");
                return Ok(current);
            }

            match self.storage.expenses.replace_if_version(updated, expected) {
                Ok(stored) => {
                    self.storage.expenses.save()?;
                    tracing::info!(
                        expense = %stored.id,
                        status = %stored.status,
                        version = stored.version,
                        "Applied payment updates"
                    );
                    return Ok(stored);
                }
                Err(e) if e.is_conflict() => {
                    tracing::warn!(
                        expense = %expense_id,
                        attempt,
                        "Expense changed during payment update, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(LedgerError::Conflict {
            entity_type: "Expense",
            identifier: expense_id.to_string(),
        })
    }

    /// Get an expense by ID, failing with `ExpenseNotFound`
    pub fn get(&self, id: ExpenseId) -> LedgerResult<Expense> {
        self.storage
            .expenses
            .get(id)?
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))
    }

    /// Find by full or short ID, failing with `ExpenseNotFound`
    pub fn resolve(&self, identifier: &str) -> LedgerResult<Expense> {
        self.storage
            .expenses
            .find(identifier)?
            .ok_or_else(|| LedgerError::expense_not_found(identifier))
    }

    /// A group's history, expenses and settlements, oldest first
    pub fn list_for_group(&self, group_id: GroupId) -> LedgerResult<Vec<Expense>> {
        self.storage.expenses.get_by_group(group_id)
    }
}
