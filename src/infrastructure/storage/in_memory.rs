//! In-memory leadership store

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::leadership::{LeadershipRecord, LeadershipRecordId, LeadershipRepository};
use crate::domain::membership::{Membership, MembershipId, MembershipRepository};
use crate::domain::storage::{LeadershipStore, StoreTransaction};
use crate::domain::team::{Team, TeamId, TeamRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Clone, Default)]
struct InMemoryState {
    teams: HashMap<TeamId, Team>,
    users: HashMap<UserId, User>,
    memberships: BTreeMap<MembershipId, Membership>,
    leadership: BTreeMap<LeadershipRecordId, LeadershipRecord>,
    last_membership_id: i64,
    last_record_id: i64,
}

impl InMemoryState {
    fn insert_membership(&mut self, membership: Membership) -> Result<Membership, DomainError> {
        if !self.teams.contains_key(&membership.team_id()) {
            return Err(DomainError::not_found(format!(
                "Team {} not found",
                membership.team_id()
            )));
        }

        if !self.users.contains_key(&membership.user_id()) {
            return Err(DomainError::not_found(format!(
                "User {} not found",
                membership.user_id()
            )));
        }

        if membership.is_active() {
            let clash = self.memberships.values().any(|existing| {
                existing.is_active()
                    && existing.user_id() == membership.user_id()
                    && existing.id() != membership.id()
            });

            if clash {
                return Err(DomainError::conflict(format!(
                    "User {} already has an active membership",
                    membership.user_id()
                )));
            }
        }

        let membership = match membership.id() {
            Some(id) => {
                if !self.memberships.contains_key(&id) {
                    return Err(DomainError::not_found(format!(
                        "Membership {} not found",
                        id
                    )));
                }
                membership
            }
            None => {
                self.last_membership_id += 1;
                membership.with_id(MembershipId::new(self.last_membership_id))
            }
        };

        if let Some(id) = membership.id() {
            self.memberships.insert(id, membership.clone());
        }

        Ok(membership)
    }

    fn insert_record(&mut self, record: LeadershipRecord) -> Result<LeadershipRecord, DomainError> {
        if !self.teams.contains_key(&record.team_id()) {
            return Err(DomainError::not_found(format!(
                "Team {} not found",
                record.team_id()
            )));
        }

        if !self.users.contains_key(&record.leader_id()) {
            return Err(DomainError::not_found(format!(
                "User {} not found",
                record.leader_id()
            )));
        }

        if record.is_active() {
            let clash = self.leadership.values().any(|existing| {
                existing.is_active()
                    && existing.team_id() == record.team_id()
                    && existing.id() != record.id()
            });

            if clash {
                return Err(DomainError::conflict(format!(
                    "Team {} already has an active leadership record",
                    record.team_id()
                )));
            }
        }

        let record = match record.id() {
            Some(id) => {
                if !self.leadership.contains_key(&id) {
                    return Err(DomainError::not_found(format!(
                        "Leadership record {} not found",
                        id
                    )));
                }
                record
            }
            None => {
                self.last_record_id += 1;
                record.with_id(LeadershipRecordId::new(self.last_record_id))
            }
        };

        if let Some(id) = record.id() {
            self.leadership.insert(id, record.clone());
        }

        Ok(record)
    }
}

/// Thread-safe in-memory leadership store
///
/// Useful for testing and development. Data is lost when the process
/// terminates. Transactions are fully serialized: each one holds the state
/// lock from `begin` until it is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLeadershipStore {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryLeadershipStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a team
    pub async fn insert_team(&self, team: Team) {
        self.state.lock().await.teams.insert(team.id(), team);
    }

    /// Add or replace a user
    pub async fn insert_user(&self, user: User) {
        self.state.lock().await.users.insert(user.id(), user);
    }

    /// Save a membership outside of any leadership operation
    pub async fn insert_membership(&self, membership: Membership) -> Result<Membership, DomainError> {
        self.state.lock().await.insert_membership(membership)
    }

    /// Soft-delete a team
    pub async fn delete_team(&self, id: TeamId) -> bool {
        match self.state.lock().await.teams.get_mut(&id) {
            Some(team) => {
                team.mark_deleted();
                true
            }
            None => false,
        }
    }

    /// Soft-delete a user
    pub async fn delete_user(&self, id: UserId) -> bool {
        match self.state.lock().await.users.get_mut(&id) {
            Some(user) => {
                user.mark_deleted();
                true
            }
            None => false,
        }
    }

    /// Snapshot of every membership, ordered by ID
    pub async fn memberships(&self) -> Vec<Membership> {
        self.state.lock().await.memberships.values().cloned().collect()
    }

    /// Snapshot of every leadership record, ordered by ID
    pub async fn leadership_records(&self) -> Vec<LeadershipRecord> {
        self.state.lock().await.leadership.values().cloned().collect()
    }
}

#[async_trait]
impl LeadershipStore for InMemoryLeadershipStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, DomainError> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();

        Ok(Box::new(InMemoryTransaction { guard, working }))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Transaction over a private copy of the state, published on commit
struct InMemoryTransaction {
    guard: OwnedMutexGuard<InMemoryState>,
    working: InMemoryState,
}

#[async_trait]
impl TeamRepository for InMemoryTransaction {
    async fn find_active_team(&mut self, id: TeamId) -> Result<Option<Team>, DomainError> {
        Ok(self
            .working
            .teams
            .get(&id)
            .filter(|team| !team.is_deleted())
            .cloned())
    }
}

#[async_trait]
impl UserRepository for InMemoryTransaction {
    async fn find_active_user(&mut self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self
            .working
            .users
            .get(&id)
            .filter(|user| !user.is_deleted())
            .cloned())
    }

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.working.users.get(&id).cloned())
    }
}

#[async_trait]
impl MembershipRepository for InMemoryTransaction {
    async fn find_active_membership_for_user(
        &mut self,
        user_id: UserId,
    ) -> Result<Option<Membership>, DomainError> {
        Ok(self
            .working
            .memberships
            .values()
            .find(|m| m.is_active() && m.user_id() == user_id)
            .cloned())
    }

    async fn save_membership(&mut self, membership: Membership) -> Result<Membership, DomainError> {
        self.working.insert_membership(membership)
    }
}

#[async_trait]
impl LeadershipRepository for InMemoryTransaction {
    async fn find_active_leader_record(
        &mut self,
        team_id: TeamId,
    ) -> Result<Option<LeadershipRecord>, DomainError> {
        Ok(self
            .working
            .leadership
            .values()
            .find(|r| r.is_active() && r.team_id() == team_id)
            .cloned())
    }

    async fn save_leadership_record(
        &mut self,
        record: LeadershipRecord,
    ) -> Result<LeadershipRecord, DomainError> {
        self.working.insert_record(record)
    }

    async fn find_history_by_team(
        &mut self,
        team_id: TeamId,
    ) -> Result<Vec<LeadershipRecord>, DomainError> {
        let mut records: Vec<LeadershipRecord> = self
            .working
            .leadership
            .values()
            .filter(|r| r.team_id() == team_id)
            .cloned()
            .collect();

        records.sort_by(|a, b| {
            b.started_at()
                .cmp(&a.started_at())
                .then_with(|| b.id().cmp(&a.id()))
        });

        Ok(records)
    }
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn commit(&mut self) -> Result<(), DomainError> {
        *self.guard = self.working.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn team_id(id: i64) -> TeamId {
        TeamId::new(id).unwrap()
    }

    fn user_id(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    async fn create_store() -> InMemoryLeadershipStore {
        let store = InMemoryLeadershipStore::new();
        store.insert_team(Team::new(team_id(1), "Team One")).await;
        store.insert_team(Team::new(team_id(2), "Team Two")).await;
        store
            .insert_user(User::new(user_id(1), "Alice", "alice@example.com"))
            .await;
        store
            .insert_user(User::new(user_id(2), "Bob", "bob@example.com"))
            .await;
        store
    }

    #[tokio::test]
    async fn test_soft_deleted_team_is_hidden() {
        let store = create_store().await;
        store.delete_team(team_id(1)).await;

        let mut tx = store.begin().await.unwrap();
        assert!(tx.find_active_team(team_id(1)).await.unwrap().is_none());
        assert!(tx.find_active_team(team_id(2)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_find_user_ignores_soft_delete() {
        let store = create_store().await;
        store.delete_user(user_id(1)).await;

        let mut tx = store.begin().await.unwrap();
        assert!(tx.find_active_user(user_id(1)).await.unwrap().is_none());
        assert!(tx.find_user(user_id(1)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_commit_publishes_writes() {
        let store = create_store().await;

        let mut tx = store.begin().await.unwrap();
        let saved = tx
            .save_leadership_record(LeadershipRecord::start(team_id(1), user_id(1), Utc::now()))
            .await
            .unwrap();
        assert!(saved.id().is_some());
        tx.commit().await.unwrap();
        drop(tx);

        assert_eq!(store.leadership_records().await.len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_transaction_discards_writes() {
        let store = create_store().await;

        {
            let mut tx = store.begin().await.unwrap();
            tx.save_membership(Membership::new(user_id(1), team_id(1)))
                .await
                .unwrap();
        }

        assert!(store.memberships().await.is_empty());
    }

    #[tokio::test]
    async fn test_second_active_record_for_team_conflicts() {
        let store = create_store().await;
        let mut tx = store.begin().await.unwrap();

        tx.save_leadership_record(LeadershipRecord::start(team_id(1), user_id(1), Utc::now()))
            .await
            .unwrap();

        let result = tx
            .save_leadership_record(LeadershipRecord::start(team_id(1), user_id(2), Utc::now()))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));

        // A different team is unaffected
        tx.save_leadership_record(LeadershipRecord::start(team_id(2), user_id(2), Utc::now()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_ended_record_frees_the_team() {
        let store = create_store().await;
        let mut tx = store.begin().await.unwrap();

        let mut first = tx
            .save_leadership_record(LeadershipRecord::start(team_id(1), user_id(1), Utc::now()))
            .await
            .unwrap();
        first.end(Utc::now());
        tx.save_leadership_record(first).await.unwrap();

        tx.save_leadership_record(LeadershipRecord::start(team_id(1), user_id(2), Utc::now()))
            .await
            .unwrap();

        let active = tx.find_active_leader_record(team_id(1)).await.unwrap().unwrap();
        assert_eq!(active.leader_id(), user_id(2));
    }

    #[tokio::test]
    async fn test_second_active_membership_for_user_conflicts() {
        let store = create_store().await;
        store
            .insert_membership(Membership::new(user_id(1), team_id(2)))
            .await
            .unwrap();

        let result = store
            .insert_membership(Membership::new(user_id(1), team_id(1)))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_membership_lookup_is_system_wide() {
        let store = create_store().await;
        store
            .insert_membership(Membership::new(user_id(1), team_id(2)))
            .await
            .unwrap();

        let mut tx = store.begin().await.unwrap();
        let membership = tx
            .find_active_membership_for_user(user_id(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(membership.team_id(), team_id(2));
    }

    #[tokio::test]
    async fn test_save_rejects_unknown_team() {
        let store = create_store().await;
        let mut tx = store.begin().await.unwrap();

        let result = tx.save_membership(Membership::new(user_id(1), team_id(9))).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let store = create_store().await;
        let mut tx = store.begin().await.unwrap();
        let now = Utc::now();

        let mut old = LeadershipRecord::start(team_id(1), user_id(1), now - Duration::days(30));
        old.end(now - Duration::days(10));
        tx.save_leadership_record(old).await.unwrap();
        tx.save_leadership_record(LeadershipRecord::start(team_id(1), user_id(2), now))
            .await
            .unwrap();
        tx.save_leadership_record(LeadershipRecord::start(team_id(2), user_id(1), now))
            .await
            .unwrap();

        let history = tx.find_history_by_team(team_id(1)).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].leader_id(), user_id(2));
        assert_eq!(history[1].leader_id(), user_id(1));
    }
}
