//! Storage layer for splitledger
//!
//! JSON files with atomic writes, held in memory behind `RwLock`s while the
//! process runs.

pub mod expenses;
pub mod file_io;
pub mod groups;

pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use groups::GroupRepository;

use crate::config::paths::LedgerPaths;
use crate::error::LedgerResult;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    pub groups: GroupRepository,
    pub expenses: ExpenseRepository,
}

impl Storage {
    /// Create a storage rooted at `paths`, creating directories as needed
    pub fn new(paths: LedgerPaths) -> LedgerResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            groups: GroupRepository::new(paths.groups_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    pub fn load_all(&mut self) -> LedgerResult<()> {
        self.groups.load()?;
        self.expenses.load()?;
        Ok(())
    }

    pub fn save_all(&self) -> LedgerResult<()> {
        self.groups.save()?;
        self.expenses.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Group, Member};
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_save_all_then_load_all() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(LedgerPaths::with_base_dir(temp_dir.path())).unwrap();
        storage
            .groups
            .upsert(Group::new("Trip", Member::owner("a@x.io", None), vec![]))
            .unwrap();
        storage.save_all().unwrap();

        let mut fresh = Storage::new(LedgerPaths::with_base_dir(temp_dir.path())).unwrap();
        fresh.load_all().unwrap();
        assert_eq!(fresh.groups.count().unwrap(), 1);
        assert_eq!(fresh.expenses.count().unwrap(), 0);
    }
}
