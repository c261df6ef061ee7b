//! Expense display formatting
//!
//! Register-style listing of a group's history and a detail view with the
//! per-member splits.

use crate::models::{Expense, ExpenseStatus, SplitStatus};

use super::truncate;

fn status_icon(status: ExpenseStatus) -> &'static str {
    match status {
        ExpenseStatus::Pending => " ",
        ExpenseStatus::Partial => "~",
        ExpenseStatus::Settled => "✓",
    }
}

/// Format a single expense as a register row
pub fn format_expense_row(expense: &Expense) -> String {
    let title = if expense.is_settlement() {
        format!("⇄ {}", expense.title)
    } else {
        expense.title.clone()
    };

    format!(
        "{} {:<12} {} {:<28} {:>12} {:<4} {:<20} {}",
        status_icon(expense.status),
        expense.id.short(),
        expense.created_at.format("%Y-%m-%d"),
        truncate(&title, 28),
        expense.amount.to_string(),
        expense.currency,
        truncate(expense.paid_by.as_str(), 20),
        expense.split_method,
    )
}

/// Format a group's history as a register
pub fn format_expense_list(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:1} {:<12} {:<10} {:<28} {:>12} {:<4} {:<20} {}\n",
        "", "ID", "Date", "Title", "Amount", "Cur", "Paid by", "Split"
    ));
    output.push_str(&"-".repeat(100));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format_expense_row(expense));
        output.push('\n');
    }

    output
}

/// Format one expense with its splits
pub fn format_expense_details(expense: &Expense) -> String {
    let mut output = String::new();

    let label = if expense.is_settlement() {
        "Settlement"
    } else {
        "Expense"
    };
    output.push_str(&format!("{}: {}\n", label, expense.title));
    output.push_str(&format!("  ID:      {}\n", expense.id));
    output.push_str(&format!(
        "  Amount:  {}\n",
        expense.amount.format_with_currency(&expense.currency)
    ));
    output.push_str(&format!("  Paid by: {}\n", expense.paid_by));
    output.push_str(&format!("  Split:   {}\n", expense.split_method));
    output.push_str(&format!("  Status:  {}\n", expense.status));
    output.push_str(&format!(
        "  Created: {}\n",
        expense.created_at.format("%Y-%m-%d %H:%M")
    ));
    if let Some(notes) = &expense.notes {
        output.push_str(&format!("  Notes:   {}\n", notes));
    }
    if let Some(proof) = &expense.proof_image {
        output.push_str(&format!("  Proof:   {}\n", proof));
    }

    output.push('\n');
    output.push_str("Splits:\n");
    for split in &expense.splits {
        let detail = match (split.percent, split.shares) {
            (Some(p), _) => format!(" ({}%)", p),
            (None, Some(s)) => format!(" ({} shares)", s),
            (None, None) => String::new(),
        };
        let marker = match split.status {
            SplitStatus::Unpaid => " ",
            SplitStatus::Paid => "✓",
            SplitStatus::Verified => "✔",
        };
        output.push_str(&format!(
            "  {} {:<24} {:>12}  {}{}\n",
            marker,
            truncate(split.member.as_str(), 24),
            split.amount.to_string(),
            split.status,
            detail,
        ));
        if let Some(notes) = &split.notes {
            output.push_str(&format!("      note: {}\n", notes));
        }
    }

    output
}
