//! Team repository trait

use async_trait::async_trait;

use super::entity::{Team, TeamId};
use crate::domain::DomainError;

/// Read access to teams from inside a store transaction
#[async_trait]
pub trait TeamRepository: Send {
    /// Get a non-deleted team by ID
    ///
    /// Backends that support row locking lock the team for the rest of the
    /// transaction, serializing leadership changes on the same team.
    async fn find_active_team(&mut self, id: TeamId) -> Result<Option<Team>, DomainError>;
}
