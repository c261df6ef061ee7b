//! Balance CLI commands

use crate::display::balance::{format_group_balances, format_summary};
use crate::error::{LedgerError, LedgerResult};
use crate::services::{BalanceService, GroupService};
use crate::storage::Storage;

/// Handle `balances <group>`
pub fn handle_balances_command(storage: &Storage, group: &str) -> LedgerResult<()> {
    let group = GroupService::new(storage).resolve(group)?;
    let view = BalanceService::new(storage).group_balances(group.id)?;
    print!("{}", format_group_balances(&view));
    Ok(())
}

/// Handle `summary [email]`, falling back to `--as`
pub fn handle_summary_command(
    storage: &Storage,
    viewer: Option<&str>,
    user: Option<&str>,
) -> LedgerResult<()> {
    let viewer = viewer.or(user).ok_or_else(|| {
        LedgerError::Validation("Whose summary? Pass an email or --as".into())
    })?;
    let summary = BalanceService::new(storage).summary_for(viewer)?;
    print!("{}", format_summary(&summary));
    Ok(())
}
