//! Balance display formatting

use crate::models::{BalanceSummary, GroupBalances};

use super::truncate;

/// Format a group's balances, creditors positive and debtors negative
pub fn format_group_balances(view: &GroupBalances) -> String {
    let mut output = String::new();
    output.push_str(&format!("Balances: {} ({})\n", view.group_name, view.currency));

    if view.balances.is_empty() {
        output.push_str("  No members.\n");
        return output;
    }

    output.push_str(&format!("{:<30}  {:>12}  {}\n", "Member", "Balance", ""));
    output.push_str(&format!("{:-<30}  {:->12}  {:-<12}\n", "", "", ""));

    for entry in &view.balances {
        let note = if !entry.in_roster {
            "(former)"
        } else if entry.is_creditor() {
            "is owed"
        } else if entry.is_debtor() {
            "owes"
        } else {
            "settled up"
        };
        output.push_str(&format!(
            "{:<30}  {:>12}  {}\n",
            truncate(entry.member.as_str(), 30),
            entry.balance.to_string(),
            note,
        ));
    }

    let totals = view.totals();
    output.push_str(&format!("{:-<30}  {:->12}  {:-<12}\n", "", "", ""));
    output.push_str(&format!(
        "{:<30}  {:>12}\n",
        "Owed to members",
        totals.owed_to_members.to_string()
    ));
    output.push_str(&format!(
        "{:<30}  {:>12}\n",
        "Owed by members",
        totals.owed_by_members.to_string()
    ));

    output
}

/// Format a viewer's position across groups
pub fn format_summary(summary: &BalanceSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!("Summary for {}\n", summary.viewer));

    if summary.groups.is_empty() {
        output.push_str("  Not a member of any group.\n");
        return output;
    }

    output.push_str(&format!(
        "{:<30}  {:<4}  {:>12}  {:>12}\n",
        "Group", "Cur", "Owed to you", "You owe"
    ));
    output.push_str(&format!("{:-<30}  {:-<4}  {:->12}  {:->12}\n", "", "", "", ""));

    for position in &summary.groups {
        output.push_str(&format!(
            "{:<30}  {:<4}  {:>12}  {:>12}\n",
            truncate(&position.group_name, 30),
            position.currency,
            position.owed_to_you.to_string(),
            position.you_owe.to_string(),
        ));
    }

    output.push_str(&format!("{:-<30}  {:-<4}  {:->12}  {:->12}\n", "", "", "", ""));
    output.push_str(&format!(
        "{:<30}  {:<4}  {:>12}  {:>12}\n",
        "TOTAL",
        "",
        summary.total_owed_to_you.to_string(),
        summary.total_you_owe.to_string(),
    ));

    output
}
