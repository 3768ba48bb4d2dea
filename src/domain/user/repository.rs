//! User repository trait

use async_trait::async_trait;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Read access to users from inside a store transaction
#[async_trait]
pub trait UserRepository: Send {
    /// Get a non-deleted user by ID
    async fn find_active_user(&mut self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by ID regardless of the soft-delete flag
    ///
    /// Used to render former leaders who have since been deleted.
    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, DomainError>;
}
