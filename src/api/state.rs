//! Application state for shared services

use std::sync::Arc;

use crate::domain::leadership::{HistoryEntry, LeaderInfo};
use crate::domain::storage::LeadershipStore;
use crate::domain::team::TeamId;
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::leadership::LeadershipService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub leadership_service: Arc<dyn LeadershipServiceTrait>,
    /// Backing store, probed by the readiness check
    pub store: Arc<dyn LeadershipStore>,
}

impl AppState {
    /// Build the state around a store, wiring the leadership service to it
    pub fn new(store: Arc<dyn LeadershipStore>) -> Self {
        Self {
            leadership_service: Arc::new(LeadershipService::new(store.clone())),
            store,
        }
    }
}

/// Trait for leadership service operations
#[async_trait::async_trait]
pub trait LeadershipServiceTrait: Send + Sync {
    async fn assign_leader(&self, team_id: TeamId, user_id: UserId)
        -> Result<LeaderInfo, DomainError>;
    async fn change_leader(&self, team_id: TeamId, user_id: UserId)
        -> Result<LeaderInfo, DomainError>;
    async fn remove_leader(&self, team_id: TeamId) -> Result<(), DomainError>;
    async fn get_current_leader(&self, team_id: TeamId)
        -> Result<Option<LeaderInfo>, DomainError>;
    async fn get_leadership_history(&self, team_id: TeamId)
        -> Result<Vec<HistoryEntry>, DomainError>;
}

#[async_trait::async_trait]
impl LeadershipServiceTrait for LeadershipService {
    async fn assign_leader(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> Result<LeaderInfo, DomainError> {
        LeadershipService::assign_leader(self, team_id, user_id).await
    }

    async fn change_leader(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> Result<LeaderInfo, DomainError> {
        LeadershipService::change_leader(self, team_id, user_id).await
    }

    async fn remove_leader(&self, team_id: TeamId) -> Result<(), DomainError> {
        LeadershipService::remove_leader(self, team_id).await
    }

    async fn get_current_leader(
        &self,
        team_id: TeamId,
    ) -> Result<Option<LeaderInfo>, DomainError> {
        LeadershipService::get_current_leader(self, team_id).await
    }

    async fn get_leadership_history(
        &self,
        team_id: TeamId,
    ) -> Result<Vec<HistoryEntry>, DomainError> {
        LeadershipService::get_leadership_history(self, team_id).await
    }
}
