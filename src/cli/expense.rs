//! Expense, settlement and payment CLI commands

use clap::{Args, Subcommand};

use crate::config::Settings;
use crate::display::expense::{format_expense_details, format_expense_list};
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{ExpenseRequest, PaymentUpdate, SettlementRequest, StrategyInput};
use crate::models::{MemberId, Money, SplitMethod, SplitStatus};
use crate::services::{CreateExpenseInput, ExpenseService, GroupService, SettlementInput};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Add an expense to a group
    Add {
        /// Group name or ID
        group: String,
        /// What the money was spent on
        title: String,
        /// Total amount (e.g., "42.50")
        amount: String,
        /// Payer email (defaults to --as, then the group owner)
        #[arg(short, long)]
        paid_by: Option<String>,
        /// Split method (equal, percent, shares, exact)
        #[arg(short, long, default_value = "equal")]
        split: String,
        /// Member to include (repeatable; defaults to everyone)
        #[arg(short, long = "member")]
        members: Vec<String>,
        /// Per-member value as EMAIL=VALUE: a percent, a share count or an amount
        #[arg(long = "share")]
        shares: Vec<String>,
        /// Currency code (defaults to the group currency)
        #[arg(long)]
        currency: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        /// Receipt image reference
        #[arg(long)]
        proof: Option<String>,
    },
    /// List a group's expenses and settlements
    List {
        /// Group name or ID
        group: String,
    },
    /// Show an expense with its splits
    Show {
        /// Expense ID (full or short)
        expense: String,
    },
}

/// Arguments for `settle`
#[derive(Args)]
pub struct SettleArgs {
    /// Group name or ID
    pub group: String,
    /// Member paying off their debt
    #[arg(long)]
    pub from: String,
    /// Member receiving the payment
    #[arg(long)]
    pub to: String,
    /// Amount paid
    pub amount: String,
    #[arg(short, long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub proof: Option<String>,
}

/// Arguments for `pay`
#[derive(Args)]
pub struct PayArgs {
    /// Expense ID (full or short)
    pub expense: String,
    /// Member whose split is updated
    pub member: String,
    /// New status (paid, verified)
    #[arg(short, long, default_value = "paid")]
    pub status: String,
    #[arg(long)]
    pub proof: Option<String>,
    #[arg(short, long)]
    pub notes: Option<String>,
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    user: Option<&str>,
    cmd: ExpenseCommands,
) -> LedgerResult<()> {
    let service = ExpenseService::new(storage);

    match cmd {
        ExpenseCommands::Add {
            group,
            title,
            amount,
            paid_by,
            split,
            members,
            shares,
            currency,
            notes,
            proof,
        } => {
            let group = GroupService::new(storage).resolve(&group)?;
            let method: SplitMethod = split.parse()?;
            let inputs = shares
                .iter()
                .map(|raw| parse_share(method, raw))
                .collect::<LedgerResult<Vec<_>>>()?;
            let requester = user
                .map(MemberId::new)
                .unwrap_or_else(|| group.owner.clone());

            let expense = service.create(
                CreateExpenseInput {
                    group_id: group.id,
                    request: ExpenseRequest {
                        title,
                        amount: parse_amount(&amount)?,
                        paid_by,
                        split_method: Some(split),
                        included_members: members,
                        inputs,
                        currency,
                        notes,
                        proof_image: proof,
                    },
                },
                &requester,
            )?;

            println!("Added expense: {}", expense);
            for split in &expense.splits {
                println!("  {:<28} {:>12}", split.member.as_str(), split.amount.to_string());
            }
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::List { group } => {
            let group = GroupService::new(storage).resolve(&group)?;
            let expenses = service.list_for_group(group.id)?;
            print!("{}", format_expense_list(&expenses));
        }

        ExpenseCommands::Show { expense } => {
            let expense = service.resolve(&expense)?;
            print!("{}", format_expense_details(&expense));
        }
    }

    Ok(())
}

/// Handle `settle`
pub fn handle_settle_command(storage: &Storage, args: SettleArgs) -> LedgerResult<()> {
    let group = GroupService::new(storage).resolve(&args.group)?;
    let settlement = ExpenseService::new(storage).record_settlement(SettlementInput {
        group_id: group.id,
        request: SettlementRequest {
            from: Some(args.from),
            to: Some(args.to),
            amount: Some(parse_amount(&args.amount)?),
            notes: args.notes,
            proof_image: args.proof,
        },
    })?;

    println!(
        "Recorded: {} ({})",
        settlement.title,
        settlement.amount.format_with_currency(&settlement.currency)
    );
    println!("  ID: {}", settlement.id);
    Ok(())
}

/// Handle `pay`
pub fn handle_pay_command(
    storage: &Storage,
    settings: &Settings,
    args: PayArgs,
) -> LedgerResult<()> {
    let status = SplitStatus::parse(&args.status).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Invalid status: '{}'. Valid statuses: unpaid, paid, verified",
            args.status
        ))
    })?;

    let service = ExpenseService::new(storage).with_payment_attempts(settings.payment_attempts());
    let expense = service.resolve(&args.expense)?;
    if expense.split_for(MemberId::new(&args.member).as_str()).is_none() {
        println!(
            "{} has no split in '{}'; nothing to update.",
            args.member, expense.title
        );
        return Ok(());
    }

    let updated = service.apply_payments(
        expense.id,
        &[PaymentUpdate {
            member: args.member,
            status: Some(status),
            proof_image: args.proof,
            notes: args.notes,
        }],
    )?;

    println!("Updated '{}': now {}", updated.title, updated.status);
    Ok(())
}

fn parse_amount(raw: &str) -> LedgerResult<f64> {
    Money::parse(raw).map(|m| m.to_decimal()).map_err(|e| {
        LedgerError::InvalidAmount(format!(
            "'{}' is not an amount. Use a format like '42.50'. Error: {}",
            raw, e
        ))
    })
}

/// Parse `EMAIL=VALUE` into the input the split method expects
fn parse_share(method: SplitMethod, raw: &str) -> LedgerResult<StrategyInput> {
    let (member, value) = raw.split_once('=').ok_or_else(|| {
        LedgerError::Validation(format!("Expected EMAIL=VALUE, got '{}'", raw))
    })?;
    let value: f64 = value.trim().parse().map_err(|_| {
        LedgerError::Validation(format!("'{}' is not a number in '{}'", value.trim(), raw))
    })?;

    match method {
        SplitMethod::Percent => Ok(StrategyInput::percent(member.trim(), value)),
        SplitMethod::Shares => Ok(StrategyInput::shares(member.trim(), value)),
        SplitMethod::Exact => Ok(StrategyInput::amount(member.trim(), value)),
        SplitMethod::Equal | SplitMethod::Settlement => Err(LedgerError::Validation(format!(
            "--share is not used by {} splits",
            method
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_share() {
        let input = parse_share(SplitMethod::Percent, "a@x.io=60").unwrap();
        assert_eq!(input, StrategyInput::percent("a@x.io", 60.0));

        let input = parse_share(SplitMethod::Exact, " b@x.io = 12.5").unwrap();
        assert_eq!(input, StrategyInput::amount("b@x.io", 12.5));

        assert!(parse_share(SplitMethod::Shares, "a@x.io").is_err());
        assert!(parse_share(SplitMethod::Shares, "a@x.io=lots").is_err());
        assert!(parse_share(SplitMethod::Equal, "a@x.io=1").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("42.50").unwrap(), 42.5);
        assert_eq!(parse_amount("abc").unwrap_err().kind(), "InvalidAmount");
        assert_eq!(parse_amount("10.999").unwrap(), 11.0);
        assert_eq!(parse_amount("10.994").unwrap(), 10.99);
        assert_eq!(parse_amount("0.009").unwrap(), 0.01);
        assert_eq!(
            parse_amount("92233720368547759").unwrap_err().kind(),
            "InvalidAmount"
        );
    }
}
