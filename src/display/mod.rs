//! Display formatting for terminal output
//!
//! Plain-text tables for groups, expenses and balances.

pub mod balance;
pub mod expense;
pub mod group;

pub use balance::{format_group_balances, format_summary};
pub use expense::{format_expense_details, format_expense_list, format_expense_row};
pub use group::{format_group_details, format_group_list};

/// Pad or cut `s` to exactly `max_len` characters
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        format!("{:width$}", s, width = max_len)
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}
