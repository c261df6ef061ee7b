//! Group model
//!
//! A group is a named collection of members who share expenses. The roster
//! keeps members in insertion order (owner first) and indexes them by
//! normalized email for constant-time lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::ids::GroupId;
use super::member::{Member, MemberId, MemberRole};

/// Kind of group, used for display and filtering only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GroupCategory {
    Trip,
    Shopping,
    Friends,
    Roommates,
    #[default]
    Other,
}

impl GroupCategory {
    /// Parse a category from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trip" => Some(Self::Trip),
            "shopping" => Some(Self::Shopping),
            "friends" => Some(Self::Friends),
            "roommates" => Some(Self::Roommates),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for GroupCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trip => write!(f, "Trip"),
            Self::Shopping => write!(f, "Shopping"),
            Self::Friends => write!(f, "Friends"),
            Self::Roommates => write!(f, "Roommates"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Per-group settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSettings {
    /// Currency every expense in the group is settled in
    pub currency: String,
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
        }
    }
}

/// Ordered set of unique members, indexed by email
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Member>", into = "Vec<Member>")]
pub struct MemberRoster {
    members: Vec<Member>,
    index: HashMap<MemberId, usize>,
}

impl MemberRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member; returns false (and changes nothing) for a blank or
    /// already-present email
    pub fn insert(&mut self, member: Member) -> bool {
        if member.email.is_empty() || self.index.contains_key(&member.email) {
            return false;
        }
        self.index.insert(member.email.clone(), self.members.len());
        self.members.push(member);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Member> {
        self.index.get(id).map(|&i| &self.members[i])
    }

    pub fn ids(&self) -> impl Iterator<Item = &MemberId> {
        self.members.iter().map(|m| &m.email)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl From<Vec<Member>> for MemberRoster {
    fn from(members: Vec<Member>) -> Self {
        let mut roster = Self::new();
        for member in members {
            roster.insert(member);
        }
        roster
    }
}

impl From<MemberRoster> for Vec<Member> {
    fn from(roster: MemberRoster) -> Self {
        roster.members
    }
}

impl PartialEq for MemberRoster {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

/// A group of people sharing expenses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,

    pub name: String,

    #[serde(default)]
    pub category: GroupCategory,

    /// Optional photo reference (URL or path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    pub owner: MemberId,

    pub members: MemberRoster,

    /// Emails invited at creation or via add-member
    #[serde(default)]
    pub invited_emails: Vec<String>,

    #[serde(default)]
    pub settings: GroupSettings,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Create a group. The owner is always the first member with role
    /// `owner`; further members are deduplicated by email and blank emails
    /// are skipped.
    pub fn new(name: impl Into<String>, owner: Member, members: Vec<Member>) -> Self {
        let now = Utc::now();
        let owner_id = owner.email.clone();

        let mut roster = MemberRoster::new();
        roster.insert(Member {
            role: MemberRole::Owner,
            ..owner
        });
        for member in members {
            roster.insert(Member {
                role: MemberRole::Member,
                ..member
            });
        }

        let invited_emails = roster.ids().map(|id| id.to_string()).collect();

        Self {
            id: GroupId::new(),
            name: name.into(),
            category: GroupCategory::default(),
            photo: None,
            owner: owner_id,
            members: roster,
            invited_emails,
            settings: GroupSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if an email belongs to the roster
    pub fn is_member(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// Look up a member by email
    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.get(id)
    }

    /// Add a member; returns false if the email is already present
    pub fn add_member(&mut self, member: Member) -> bool {
        let email = member.email.to_string();
        let added = self.members.insert(Member {
            role: MemberRole::Member,
            ..member
        });
        if added {
            if !self.invited_emails.contains(&email) {
                self.invited_emails.push(email);
            }
            self.updated_at = Utc::now();
        }
        added
    }

    pub fn currency(&self) -> &str {
        &self.settings.currency
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {} members)", self.name, self.category, self.members.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_group() -> Group {
        Group::new(
            "Lisbon",
            Member::owner("alice@example.com", Some("Alice")),
            vec![
                Member::new("Bob@Example.com", Some("Bob")),
                Member::new("bob@example.com", Some("Bobby")),
                Member::new("  ", None),
                Member::new("carol@example.com", None),
            ],
        )
    }

    #[test]
    fn test_owner_first_and_deduplicated() {
        let group = sample_group();
        let ids: Vec<_> = group.members.ids().map(|id| id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["alice@example.com", "bob@example.com", "carol@example.com"]
        );
        assert!(group.members.get("alice@example.com").unwrap().is_owner());
        assert_eq!(group.member("bob@example.com").unwrap().name, "Bob");
        assert_eq!(group.owner.as_str(), "alice@example.com");
    }

    #[test]
    fn test_owner_listed_again_keeps_owner_role() {
        let group = Group::new(
            "Flat",
            Member::owner("alice@example.com", None),
            vec![Member::new("ALICE@example.com", Some("Again"))],
        );
        assert_eq!(group.members.len(), 1);
        assert_eq!(
            group.member("alice@example.com").unwrap().role,
            MemberRole::Owner
        );
    }

    #[test]
    fn test_add_member() {
        let mut group = sample_group();
        assert!(group.add_member(Member::new("dave@example.com", None)));
        assert!(!group.add_member(Member::new("DAVE@example.com", None)));
        assert!(group.is_member("dave@example.com"));
        assert!(group.invited_emails.contains(&"dave@example.com".to_string()));
        assert_eq!(group.members.len(), 4);
    }

    #[test]
    fn test_serialization_rebuilds_index() {
        let group = sample_group();
        let json = serde_json::to_string(&group).unwrap();
        let restored: Group = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.members, group.members);
        assert!(restored.is_member("carol@example.com"));
        assert_eq!(restored.currency(), "USD");
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(GroupCategory::parse("trip"), Some(GroupCategory::Trip));
        assert_eq!(GroupCategory::parse("ROOMMATES"), Some(GroupCategory::Roommates));
        assert_eq!(GroupCategory::parse("boat"), None);
    }
}
