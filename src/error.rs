//! Error types for splitledger
//!
//! Every failure the ledger engine, the storage layer or the services can
//! report is a variant of [`LedgerError`]. Validation failures carry the
//! offending member or amount so callers can build a user-facing message.

use thiserror::Error;

/// The main error type for splitledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Total amount is non-positive or not a finite number
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Strategy inputs do not reconcile with the total
    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    /// A strategy input names someone outside the included members
    #[error("Member {member} is not part of this expense")]
    UnknownMember { member: String },

    /// Unrecognized split strategy tag
    #[error("Unsupported split method: {0}")]
    UnsupportedStrategy(String),

    /// Settlement request is missing payer, payee or amount
    #[error("Invalid settlement: {0}")]
    InvalidSettlement(String),

    /// Payment status would move backwards
    #[error("Cannot change payment status of {member} from {from} to {to}")]
    InvalidTransition {
        member: String,
        from: String,
        to: String,
    },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Record changed underneath a read-modify-write
    #[error("{entity_type} {identifier} was modified concurrently")]
    Conflict {
        entity_type: &'static str,
        identifier: String,
    },

    /// Input validation errors outside the split rules
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Create a "not found" error for groups
    pub fn group_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Group",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create an "unknown member" error
    pub fn unknown_member(member: impl Into<String>) -> Self {
        Self::UnknownMember {
            member: member.into(),
        }
    }

    /// Stable name of the error kind, for structured reporting
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "InvalidAmount",
            Self::InvalidSplit(_) => "InvalidSplit",
            Self::UnknownMember { .. } => "UnknownMember",
            Self::UnsupportedStrategy(_) => "UnsupportedStrategy",
            Self::InvalidSettlement(_) => "InvalidSettlement",
            Self::InvalidTransition { .. } => "InvalidTransition",
            Self::NotFound {
                entity_type: "Group",
                ..
            } => "GroupNotFound",
            Self::NotFound {
                entity_type: "Expense",
                ..
            } => "ExpenseNotFound",
            Self::NotFound { .. } => "NotFound",
            Self::Duplicate { .. } => "Duplicate",
            Self::Conflict { .. } => "Conflict",
            Self::Validation(_) => "Validation",
            Self::Config(_) => "Config",
            Self::Io(_) => "Io",
            Self::Json(_) => "Json",
            Self::Storage(_) => "Storage",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error was caused by caller input rather than the environment
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InvalidSplit(_)
                | Self::UnknownMember { .. }
                | Self::UnsupportedStrategy(_)
                | Self::InvalidSettlement(_)
                | Self::InvalidTransition { .. }
                | Self::Validation(_)
        )
    }

    /// Check if this is an optimistic-concurrency conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for splitledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
