//! Expense repository
//!
//! Expenses and settlements live together in expenses.json, indexed by group.
//! Updates go through a version check so concurrent read-modify-write cycles
//! cannot silently overwrite each other.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, ExpenseId, GroupId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expense persistence with a group index
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
    /// Index: group_id -> expense_ids
    by_group: RwLock<HashMap<GroupId, Vec<ExpenseId>>>,
    /// Serializes snapshot-and-write so an older snapshot never lands last
    save_lock: Mutex<()>,
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_group: RwLock::new(HashMap::new()),
            save_lock: Mutex::new(()),
        }
    }

    /// Load expenses from disk and rebuild the index
    pub fn load(&self) -> LedgerResult<()> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_group = self
            .by_group
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_group.clear();

        for expense in file_data.expenses {
            by_group.entry(expense.group_id).or_default().push(expense.id);
            data.insert(expense.id, expense);
        }

        Ok(())
    }

    pub fn save(&self) -> LedgerResult<()> {
        let _guard = self
            .save_lock
            .lock()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire save lock: {}", e)))?;
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        drop(data);

        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    pub fn get(&self, id: ExpenseId) -> LedgerResult<Option<Expense>> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Look up by full id or by the short prefix shown in listings
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Expense>> {
        if let Ok(id) = identifier.parse::<ExpenseId>() {
            return self.get(id);
        }

        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let needle = identifier.trim();
        let mut matches = data.values().filter(|e| e.id.short() == needle);
        match (matches.next(), matches.next()) {
            (Some(expense), None) => Ok(Some(expense.clone())),
            _ => Ok(None),
        }
    }

    /// Full history of a group, oldest first
    pub fn get_by_group(&self, group_id: GroupId) -> LedgerResult<Vec<Expense>> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_group = self
            .by_group
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_group.get(&group_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut expenses: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        expenses.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(expenses)
    }

    /// Store a new expense
    pub fn insert(&self, expense: Expense) -> LedgerResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_group = self
            .by_group
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if data.contains_key(&expense.id) {
            return Err(LedgerError::Duplicate {
                entity_type: "Expense",
                identifier: expense.id.to_string(),
            });
        }

        by_group.entry(expense.group_id).or_default().push(expense.id);
        data.insert(expense.id, expense);
        Ok(())
    }

    /// Replace an expense if the stored version still equals `expected`
    ///
    /// On success the stored copy gets `expected + 1` and is returned.
    pub fn replace_if_version(&self, mut expense: Expense, expected: u64) -> LedgerResult<Expense> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let current = data
            .get(&expense.id)
            .ok_or_else(|| LedgerError::expense_not_found(expense.id.to_string()))?;

        if current.version != expected {
            return Err(LedgerError::Conflict {
                entity_type: "Expense",
                identifier: expense.id.to_string(),
            });
        }

        // group_id is fixed for the life of an expense; the index stays valid
        expense.group_id = current.group_id;
        expense.version = expected + 1;
        data.insert(expense.id, expense.clone());
        Ok(expense)
    }

    pub fn count(&self) -> LedgerResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}
