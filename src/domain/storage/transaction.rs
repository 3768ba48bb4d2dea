//! Transactional access to the leadership stores

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::leadership::LeadershipRepository;
use crate::domain::membership::MembershipRepository;
use crate::domain::team::TeamRepository;
use crate::domain::user::UserRepository;
use crate::domain::DomainError;

/// One atomic unit of work over the team, user, membership and leadership
/// stores
///
/// Writes become visible to other transactions only after [`commit`]. A
/// transaction dropped without committing discards everything it wrote.
///
/// [`commit`]: StoreTransaction::commit
#[async_trait]
pub trait StoreTransaction:
    TeamRepository + UserRepository + MembershipRepository + LeadershipRepository + Send
{
    /// Make all writes of this transaction durable
    async fn commit(&mut self) -> Result<(), DomainError>;
}

/// Entry point to the backing store
#[async_trait]
pub trait LeadershipStore: Send + Sync + Debug {
    /// Open a new transaction
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, DomainError>;

    /// Short name of the backend for logs and health checks
    fn backend_name(&self) -> &'static str;
}
