//! Membership repository trait

use async_trait::async_trait;

use super::entity::Membership;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Membership access from inside a store transaction
#[async_trait]
pub trait MembershipRepository: Send {
    /// Get the user's active membership in any team
    async fn find_active_membership_for_user(
        &mut self,
        user_id: UserId,
    ) -> Result<Option<Membership>, DomainError>;

    /// Insert a new membership or update an existing one
    ///
    /// Returns `Conflict` when the write would leave the user with two active
    /// memberships.
    async fn save_membership(&mut self, membership: Membership) -> Result<Membership, DomainError>;
}
