use anyhow::Result;
use clap::{Parser, Subcommand};

use splitledger::cli::{
    handle_balances_command, handle_expense_command, handle_group_command, handle_pay_command,
    handle_settle_command, handle_summary_command, ExpenseCommands, GroupCommands, PayArgs,
    SettleArgs,
};
use splitledger::config::{paths::LedgerPaths, settings::Settings};
use splitledger::logging::init_tracing;
use splitledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "splitledger",
    version,
    about = "Shared-expense ledger for groups",
    long_about = "splitledger records what a group spends, splits each expense between \
                  its members, tracks who has paid their share, and shows who owes whom."
)]
struct Cli {
    /// Act as this member (used as requester and default viewer)
    #[arg(long = "as", global = true, env = "SPLITLEDGER_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Group management commands
    #[command(subcommand)]
    Group(GroupCommands),

    /// Expense commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Record a payment from one member to another
    Settle(SettleArgs),

    /// Update a member's payment status on an expense
    Pay(PayArgs),

    /// Show member balances for a group
    Balances {
        /// Group name or ID
        group: String,
    },

    /// Show what a member is owed and owes across groups
    Summary {
        /// Member email (defaults to --as)
        email: Option<String>,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings.log_filter);

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let user = cli.user.as_deref();

    match cli.command {
        Some(Commands::Group(cmd)) => handle_group_command(&storage, &settings, user, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, user, cmd)?,
        Some(Commands::Settle(args)) => handle_settle_command(&storage, args)?,
        Some(Commands::Pay(args)) => handle_pay_command(&storage, &settings, args)?,
        Some(Commands::Balances { group }) => handle_balances_command(&storage, &group)?,
        Some(Commands::Summary { email }) => {
            handle_summary_command(&storage, email.as_deref(), user)?
        }
        Some(Commands::Init) => {
            println!("Initializing splitledger at: {}", paths.base_dir().display());
            settings.setup_completed = true;
            settings.save(&paths)?;
            storage.save_all()?;
            println!("Initialization complete!");
            println!();
            println!("Create a group with:");
            println!("  splitledger group create \"Flat\" --owner you@example.com --member friend@example.com");
        }
        Some(Commands::Config) => {
            println!("splitledger Configuration");
            println!("=========================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Initialized:     {}", if paths.is_initialized() { "yes" } else { "no" });
            println!();
            println!("Settings:");
            println!("  Default currency:       {}", settings.default_currency);
            println!("  Log filter:             {}", settings.log_filter);
            println!("  Payment update retries: {}", settings.payment_update_retries);
        }
        None => {
            println!("splitledger - shared expenses for groups");
            println!();
            println!("Run 'splitledger --help' for usage information.");
        }
    }

    Ok(())
}
