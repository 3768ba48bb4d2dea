//! User entity and related types

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// User identifier - positive integer assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Create a new UserId after validation
    pub fn new(id: i64) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::invalid_id(format!(
                "User ID must be positive, got {}",
                id
            )));
        }

        Ok(Self(id))
    }

    /// Get the inner integer value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    deleted: bool,
}

impl User {
    /// Create a new, non-deleted user
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            deleted: false,
        }
    }

    /// Rebuild a user from persisted state
    pub fn restore(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        deleted: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            deleted,
        }
    }

    // Getters

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Soft-delete the user
    pub fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}
