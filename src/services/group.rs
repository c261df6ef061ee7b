//! Group service
//!
//! Creating groups, managing their rosters and looking them up.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Group, GroupCategory, GroupId, Member, MemberId};
use crate::storage::Storage;

/// Service for group management
pub struct GroupService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new group
#[derive(Debug, Clone, Default)]
pub struct CreateGroupInput {
    pub name: String,
    pub owner_email: String,
    pub owner_name: Option<String>,
    /// Further member emails; blanks and duplicates are dropped
    pub members: Vec<String>,
    pub category: Option<GroupCategory>,
    pub currency: Option<String>,
    pub photo: Option<String>,
}

impl<'a> GroupService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a group with the owner as its first member
    pub fn create(&self, input: CreateGroupInput) -> LedgerResult<Group> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("Group name cannot be empty".into()));
        }
        let owner_email = MemberId::new(&input.owner_email);
        if owner_email.is_empty() {
            return Err(LedgerError::Validation("Group owner email is required".into()));
        }
        if self.storage.groups.find_by_name(name)?.is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Group",
                identifier: name.to_string(),
            });
        }

        let members = input
            .members
            .iter()
            .map(|email| Member::new(email.as_str(), None))
            .collect();
        let mut group = Group::new(
            name,
            Member::owner(owner_email, input.owner_name.as_deref()),
            members,
        );
        group.category = input.category.unwrap_or_default();
        group.photo = input.photo;
        if let Some(currency) = input.currency.map(|c| c.trim().to_uppercase()) {
            if !currency.is_empty() {
                group.settings.currency = currency;
            }
        }

        self.storage.groups.upsert(group.clone())?;
        self.storage.groups.save()?;

        tracing::info!(group = %group.id, name = %group.name, members = group.members.len(), "Created group");
        Ok(group)
    }

    /// Add a member to an existing group
    pub fn add_member(
        &self,
        group_id: GroupId,
        email: &str,
        name: Option<&str>,
    ) -> LedgerResult<Group> {
        let mut group = self.get(group_id)?;

        let member = Member::new(email, name);
        if member.email.is_empty() {
            return Err(LedgerError::Validation("Member email cannot be empty".into()));
        }
        if !group.add_member(member) {
            return Err(LedgerError::Duplicate {
                entity_type: "Member",
                identifier: MemberId::new(email).to_string(),
            });
        }

        self.storage.groups.upsert(group.clone())?;
        self.storage.groups.save()?;

        tracing::info!(group = %group.id, member = %MemberId::new(email), "Added member");
        Ok(group)
    }

    /// Get a group by ID, failing with `GroupNotFound`
    pub fn get(&self, id: GroupId) -> LedgerResult<Group> {
        self.storage
            .groups
            .get(id)?
            .ok_or_else(|| LedgerError::group_not_found(id.to_string()))
    }

    /// Find a group by name or ID string
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Group>> {
        if let Some(group) = self.storage.groups.find_by_name(identifier)? {
            return Ok(Some(group));
        }

        if let Ok(id) = identifier.parse::<GroupId>() {
            return self.storage.groups.get(id);
        }

        let needle = identifier.trim();
        Ok(self
            .storage
            .groups
            .get_all()?
            .into_iter()
            .find(|g| g.id.short() == needle))
    }

    /// Like [`find`](Self::find) but a miss is an error
    pub fn resolve(&self, identifier: &str) -> LedgerResult<Group> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::group_not_found(identifier))
    }

    pub fn list(&self) -> LedgerResult<Vec<Group>> {
        self.storage.groups.get_all()
    }

    /// Groups whose roster contains `email`
    pub fn list_for_member(&self, email: &str) -> LedgerResult<Vec<Group>> {
        let member = MemberId::new(email);
        Ok(self
            .storage
            .groups
            .get_all()?
            .into_iter()
            .filter(|g| g.is_member(member.as_str()))
            .collect())
    }
}
