//! Group CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::group::{format_group_details, format_group_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::GroupCategory;
use crate::services::{CreateGroupInput, GroupService};
use crate::storage::Storage;

/// Group subcommands
#[derive(Subcommand)]
pub enum GroupCommands {
    /// Create a new group
    Create {
        /// Group name
        name: String,
        /// Owner email (defaults to --as)
        #[arg(short, long)]
        owner: Option<String>,
        /// Owner display name
        #[arg(long)]
        owner_name: Option<String>,
        /// Member email (repeatable)
        #[arg(short, long = "member")]
        members: Vec<String>,
        /// Category (trip, shopping, friends, roommates, other)
        #[arg(short, long, default_value = "other")]
        category: String,
        /// Currency code (defaults to the configured currency)
        #[arg(long)]
        currency: Option<String>,
    },
    /// List groups
    List {
        /// Only groups this email belongs to
        #[arg(short, long)]
        member: Option<String>,
    },
    /// Show a group and its members
    Show {
        /// Group name or ID
        group: String,
    },
    /// Add a member to a group
    AddMember {
        /// Group name or ID
        group: String,
        /// Member email
        email: String,
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },
}

/// Handle a group command
pub fn handle_group_command(
    storage: &Storage,
    settings: &Settings,
    user: Option<&str>,
    cmd: GroupCommands,
) -> LedgerResult<()> {
    let service = GroupService::new(storage);

    match cmd {
        GroupCommands::Create {
            name,
            owner,
            owner_name,
            members,
            category,
            currency,
        } => {
            let category = GroupCategory::parse(&category).ok_or_else(|| {
                LedgerError::Validation(format!(
                    "Invalid category: '{}'. Valid categories: trip, shopping, friends, roommates, other",
                    category
                ))
            })?;
            let owner_email = owner.or_else(|| user.map(str::to_string)).ok_or_else(|| {
                LedgerError::Validation("An owner is required: pass --owner or --as".into())
            })?;

            let group = service.create(CreateGroupInput {
                name,
                owner_email,
                owner_name,
                members,
                category: Some(category),
                currency: Some(currency.unwrap_or_else(|| settings.default_currency.clone())),
                photo: None,
            })?;

            println!("Created group: {}", group.name);
            println!("  Members:  {}", group.members.len());
            println!("  Currency: {}", group.currency());
            println!("  ID: {}", group.id);
        }

        GroupCommands::List { member } => {
            let groups = match member {
                Some(email) => service.list_for_member(&email)?,
                None => service.list()?,
            };
            print!("{}", format_group_list(&groups));
        }

        GroupCommands::Show { group } => {
            let group = service.resolve(&group)?;
            print!("{}", format_group_details(&group));
        }

        GroupCommands::AddMember { group, email, name } => {
            let group = service.resolve(&group)?;
            let group = service.add_member(group.id, &email, name.as_deref())?;
            println!(
                "Added {} to {} ({} members)",
                email.trim().to_lowercase(),
                group.name,
                group.members.len()
            );
        }
    }

    Ok(())
}
