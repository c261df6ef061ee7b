//! Group member model
//!
//! Members are identified by their email address, normalized to lower case so
//! that `Alice@Example.com` and `alice@example.com` are the same person.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Normalized member identifier (trimmed, lower-cased email)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MemberId(String);

impl MemberId {
    /// Normalize a raw identifier
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase())
    }

    /// Normalize an optional raw identifier, treating blank input as absent
    pub fn from_optional(raw: Option<&str>) -> Option<Self> {
        raw.map(Self::new).filter(|id| !id.is_empty())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MemberId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for MemberId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.0
    }
}

impl Borrow<str> for MemberId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Role of a member within a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Created the group
    Owner,
    #[default]
    Member,
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Member => write!(f, "member"),
        }
    }
}

/// A member of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Normalized email
    pub email: MemberId,

    /// Display name (defaults to the email)
    pub name: String,

    #[serde(default)]
    pub role: MemberRole,
}

impl Member {
    /// Create a regular member; a blank name falls back to the email
    pub fn new(email: impl Into<MemberId>, name: Option<&str>) -> Self {
        let email = email.into();
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| email.to_string());
        Self {
            email,
            name,
            role: MemberRole::Member,
        }
    }

    /// Create the owning member of a group
    pub fn owner(email: impl Into<MemberId>, name: Option<&str>) -> Self {
        Self {
            role: MemberRole::Owner,
            ..Self::new(email, name)
        }
    }

    pub fn is_owner(&self) -> bool {
        self.role == MemberRole::Owner
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == self.email.as_str() {
            write!(f, "{}", self.email)
        } else {
            write!(f, "{} <{}>", self.name, self.email)
        }
    }
}
