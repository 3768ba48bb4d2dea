//! Leadership history repository trait

use async_trait::async_trait;

use super::entity::LeadershipRecord;
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// Leadership history access from inside a store transaction
#[async_trait]
pub trait LeadershipRepository: Send {
    /// Get the team's record with no end time, if any
    async fn find_active_leader_record(
        &mut self,
        team_id: TeamId,
    ) -> Result<Option<LeadershipRecord>, DomainError>;

    /// Insert a new record or update an existing one
    ///
    /// Returns `Conflict` when the write would leave the team with two
    /// active records.
    async fn save_leadership_record(
        &mut self,
        record: LeadershipRecord,
    ) -> Result<LeadershipRecord, DomainError>;

    /// All records of the team, most recently started first
    async fn find_history_by_team(
        &mut self,
        team_id: TeamId,
    ) -> Result<Vec<LeadershipRecord>, DomainError>;
}
