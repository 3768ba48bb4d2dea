//! Leadership service for assigning, changing and removing team leaders

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::leadership::{HistoryEntry, LeaderInfo, LeadershipRecord, LeadershipRepository};
use crate::domain::membership::{Membership, MembershipRepository};
use crate::domain::storage::{LeadershipStore, StoreTransaction};
use crate::domain::team::{TeamId, TeamRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// Leadership service
///
/// Holds no state of its own. Every operation runs in a single store
/// transaction, so the checks it performs and the writes that follow them are
/// atomic with respect to other callers.
#[derive(Debug, Clone)]
pub struct LeadershipService {
    store: Arc<dyn LeadershipStore>,
}

impl LeadershipService {
    /// Create a new leadership service
    pub fn new(store: Arc<dyn LeadershipStore>) -> Self {
        Self { store }
    }

    /// Make `user_id` the leader of a team that currently has none
    ///
    /// A user who is not an active member of any team is enrolled in the
    /// team as part of the assignment.
    pub async fn assign_leader(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> Result<LeaderInfo, DomainError> {
        info!(team_id = %team_id, user_id = %user_id, "Assigning team leader");

        let mut tx = self.store.begin().await?;

        tx.find_active_team(team_id)
            .await?
            .ok_or_else(|| team_not_found(team_id))?;

        let user = tx
            .find_active_user(user_id)
            .await?
            .ok_or_else(|| user_not_found(user_id))?;

        if tx.find_active_leader_record(team_id).await?.is_some() {
            warn!(team_id = %team_id, "Team already has a leader");
            return Err(DomainError::invalid_state(format!(
                "Team {} already has a leader",
                team_id
            )));
        }

        match tx.find_active_membership_for_user(user_id).await? {
            None => {
                tx.save_membership(Membership::new(user_id, team_id)).await?;
                debug!(team_id = %team_id, user_id = %user_id, "Enrolled new leader as team member");
            }
            Some(membership) if membership.team_id() != team_id => {
                warn!(
                    user_id = %user_id,
                    other_team_id = %membership.team_id(),
                    "User is active in another team"
                );
                return Err(DomainError::invalid_state(format!(
                    "User {} is already an active member of another team",
                    user_id
                )));
            }
            Some(_) => {}
        }

        let record = tx
            .save_leadership_record(LeadershipRecord::start(team_id, user_id, Utc::now()))
            .await?;

        tx.commit().await?;

        info!(team_id = %team_id, user_id = %user_id, "Team leader assigned");
        Ok(LeaderInfo::new(&user, &record))
    }

    /// Hand leadership of a team from its current leader to `new_user_id`
    ///
    /// The new leader must already be an active member of the team. The old
    /// term is closed and the new one opened at the same instant.
    pub async fn change_leader(
        &self,
        team_id: TeamId,
        new_user_id: UserId,
    ) -> Result<LeaderInfo, DomainError> {
        info!(team_id = %team_id, user_id = %new_user_id, "Changing team leader");

        let mut tx = self.store.begin().await?;

        tx.find_active_team(team_id)
            .await?
            .ok_or_else(|| team_not_found(team_id))?;

        let new_leader = tx
            .find_active_user(new_user_id)
            .await?
            .ok_or_else(|| user_not_found(new_user_id))?;

        let mut current = tx.find_active_leader_record(team_id).await?.ok_or_else(|| {
            DomainError::invalid_state(format!(
                "Team {} has no current leader to change",
                team_id
            ))
        })?;

        let previous_leader = current.leader_id();

        if previous_leader == new_user_id {
            return Err(DomainError::invalid_state(format!(
                "User {} is already the current leader of team {}",
                new_user_id, team_id
            )));
        }

        let is_member = tx
            .find_active_membership_for_user(new_user_id)
            .await?
            .is_some_and(|m| m.team_id() == team_id);

        if !is_member {
            warn!(team_id = %team_id, user_id = %new_user_id, "New leader is not an active member");
            return Err(DomainError::invalid_state(format!(
                "User {} must be an active member of team {} to become its leader",
                new_user_id, team_id
            )));
        }

        let now = Utc::now();

        current.end(now);
        tx.save_leadership_record(current).await?;

        let record = tx
            .save_leadership_record(LeadershipRecord::start(team_id, new_user_id, now))
            .await?;

        tx.commit().await?;

        info!(
            team_id = %team_id,
            previous_leader = %previous_leader,
            user_id = %new_user_id,
            "Team leader changed"
        );
        Ok(LeaderInfo::new(&new_leader, &record))
    }

    /// End the current leader's term, leaving the team without a leader
    pub async fn remove_leader(&self, team_id: TeamId) -> Result<(), DomainError> {
        info!(team_id = %team_id, "Removing team leader");

        let mut tx = self.store.begin().await?;

        tx.find_active_team(team_id)
            .await?
            .ok_or_else(|| team_not_found(team_id))?;

        let mut current = tx.find_active_leader_record(team_id).await?.ok_or_else(|| {
            DomainError::invalid_state(format!(
                "Team {} has no active leader to remove",
                team_id
            ))
        })?;

        let leader_id = current.leader_id();
        current.end(Utc::now());
        tx.save_leadership_record(current).await?;

        tx.commit().await?;

        info!(team_id = %team_id, user_id = %leader_id, "Team leader removed");
        Ok(())
    }

    /// The team's current leader, or `None` when the team has no leader
    pub async fn get_current_leader(
        &self,
        team_id: TeamId,
    ) -> Result<Option<LeaderInfo>, DomainError> {
        debug!(team_id = %team_id, "Getting current team leader");

        let mut tx = self.store.begin().await?;

        tx.find_active_team(team_id)
            .await?
            .ok_or_else(|| team_not_found(team_id))?;

        let leader = match tx.find_active_leader_record(team_id).await? {
            Some(record) => {
                let user = tx
                    .find_user(record.leader_id())
                    .await?
                    .ok_or_else(|| missing_leader(&record))?;

                Some(LeaderInfo::new(&user, &record))
            }
            None => None,
        };

        tx.commit().await?;
        Ok(leader)
    }

    /// Every leadership term of the team, most recent first
    pub async fn get_leadership_history(
        &self,
        team_id: TeamId,
    ) -> Result<Vec<HistoryEntry>, DomainError> {
        debug!(team_id = %team_id, "Getting team leadership history");

        let mut tx = self.store.begin().await?;

        tx.find_active_team(team_id)
            .await?
            .ok_or_else(|| team_not_found(team_id))?;

        let records = tx.find_history_by_team(team_id).await?;
        let mut leaders: HashMap<UserId, User> = HashMap::new();
        let mut history = Vec::with_capacity(records.len());

        for record in &records {
            let leader_id = record.leader_id();

            if !leaders.contains_key(&leader_id) {
                let user = tx
                    .find_user(leader_id)
                    .await?
                    .ok_or_else(|| missing_leader(record))?;
                leaders.insert(leader_id, user);
            }

            if let Some(user) = leaders.get(&leader_id) {
                history.push(HistoryEntry::new(user, record));
            }
        }

        tx.commit().await?;
        Ok(history)
    }
}

fn team_not_found(team_id: TeamId) -> DomainError {
    DomainError::not_found(format!("Team {} not found", team_id))
}

fn user_not_found(user_id: UserId) -> DomainError {
    DomainError::not_found(format!("User {} not found", user_id))
}

fn missing_leader(record: &LeadershipRecord) -> DomainError {
    DomainError::internal(format!(
        "Leader {} of team {} has no user record",
        record.leader_id(),
        record.team_id()
    ))
}
