//! PostgreSQL leadership store with connection pooling

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, Row, Transaction};
use tracing::debug;

use crate::domain::leadership::{LeadershipRecord, LeadershipRecordId, LeadershipRepository};
use crate::domain::membership::{Membership, MembershipId, MembershipRepository, MembershipStatus};
use crate::domain::storage::{LeadershipStore, StoreTransaction};
use crate::domain::team::{Team, TeamId, TeamRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// PostgreSQL storage configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/team_leadership".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 30,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_acquire_timeout(mut self, secs: u64) -> Self {
        self.acquire_timeout_secs = secs;
        self
    }
}

/// PostgreSQL implementation of [`LeadershipStore`]
///
/// Each transaction locks the team row (and the user row when one is looked
/// up) with `FOR UPDATE`. Partial unique indexes on active leadership records
/// and active memberships back the same invariants at the schema level.
#[derive(Debug, Clone)]
pub struct PostgresLeadershipStore {
    pool: PgPool,
}

impl PostgresLeadershipStore {
    /// Create a store on an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a new pool
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool))
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LeadershipStore for PostgresLeadershipStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        Ok(Box::new(PostgresTransaction { tx: Some(tx) }))
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

/// Open database transaction; rolled back by sqlx when dropped uncommitted
struct PostgresTransaction {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PostgresTransaction {
    fn conn(&mut self) -> Result<&mut PgConnection, DomainError> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| DomainError::storage("Transaction already committed"))
    }
}

#[async_trait]
impl TeamRepository for PostgresTransaction {
    async fn find_active_team(&mut self, id: TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, deleted, created_at
            FROM teams
            WHERE id = $1 AND deleted = FALSE
            FOR UPDATE
            "#,
        )
        .bind(id.value())
        .fetch_optional(self.conn()?)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get team: {}", e)))?;

        row.as_ref().map(row_to_team).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresTransaction {
    async fn find_active_user(&mut self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, deleted
            FROM users
            WHERE id = $1 AND deleted = FALSE
            FOR UPDATE
            "#,
        )
        .bind(id.value())
        .fetch_optional(self.conn()?)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query("SELECT id, name, email, deleted FROM users WHERE id = $1")
            .bind(id.value())
            .fetch_optional(self.conn()?)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

#[async_trait]
impl MembershipRepository for PostgresTransaction {
    async fn find_active_membership_for_user(
        &mut self,
        user_id: UserId,
    ) -> Result<Option<Membership>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, team_id, status, joined_at
            FROM team_members
            WHERE user_id = $1 AND status = 'active'
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(self.conn()?)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get membership: {}", e)))?;

        row.as_ref().map(row_to_membership).transpose()
    }

    async fn save_membership(&mut self, membership: Membership) -> Result<Membership, DomainError> {
        let conflict = || {
            DomainError::conflict(format!(
                "User {} already has an active membership",
                membership.user_id()
            ))
        };

        match membership.id() {
            Some(id) => {
                let result = sqlx::query("UPDATE team_members SET status = $2 WHERE id = $1")
                    .bind(id.value())
                    .bind(membership.status().as_str())
                    .execute(self.conn()?)
                    .await
                    .map_err(|e| write_error(e, conflict, "Failed to update membership"))?;

                if result.rows_affected() == 0 {
                    return Err(DomainError::not_found(format!("Membership {} not found", id)));
                }

                Ok(membership)
            }
            None => {
                let id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO team_members (user_id, team_id, status, joined_at)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id
                    "#,
                )
                .bind(membership.user_id().value())
                .bind(membership.team_id().value())
                .bind(membership.status().as_str())
                .bind(membership.joined_at())
                .fetch_one(self.conn()?)
                .await
                .map_err(|e| write_error(e, conflict, "Failed to insert membership"))?;

                Ok(membership.with_id(MembershipId::new(id)))
            }
        }
    }
}

#[async_trait]
impl LeadershipRepository for PostgresTransaction {
    async fn find_active_leader_record(
        &mut self,
        team_id: TeamId,
    ) -> Result<Option<LeadershipRecord>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, team_id, leader_id, started_at, ended_at
            FROM team_leadership_history
            WHERE team_id = $1 AND ended_at IS NULL
            "#,
        )
        .bind(team_id.value())
        .fetch_optional(self.conn()?)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get active leader: {}", e)))?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn save_leadership_record(
        &mut self,
        record: LeadershipRecord,
    ) -> Result<LeadershipRecord, DomainError> {
        let conflict = || {
            DomainError::conflict(format!(
                "Team {} already has an active leadership record",
                record.team_id()
            ))
        };

        match record.id() {
            Some(id) => {
                let result =
                    sqlx::query("UPDATE team_leadership_history SET ended_at = $2 WHERE id = $1")
                        .bind(id.value())
                        .bind(record.ended_at())
                        .execute(self.conn()?)
                        .await
                        .map_err(|e| write_error(e, conflict, "Failed to update leadership record"))?;

                if result.rows_affected() == 0 {
                    return Err(DomainError::not_found(format!(
                        "Leadership record {} not found",
                        id
                    )));
                }

                Ok(record)
            }
            None => {
                let id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO team_leadership_history (team_id, leader_id, started_at, ended_at)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id
                    "#,
                )
                .bind(record.team_id().value())
                .bind(record.leader_id().value())
                .bind(record.started_at())
                .bind(record.ended_at())
                .fetch_one(self.conn()?)
                .await
                .map_err(|e| write_error(e, conflict, "Failed to insert leadership record"))?;

                debug!(record_id = id, team_id = %record.team_id(), "Inserted leadership record");
                Ok(record.with_id(LeadershipRecordId::new(id)))
            }
        }
    }

    async fn find_history_by_team(
        &mut self,
        team_id: TeamId,
    ) -> Result<Vec<LeadershipRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, team_id, leader_id, started_at, ended_at
            FROM team_leadership_history
            WHERE team_id = $1
            ORDER BY started_at DESC, id DESC
            "#,
        )
        .bind(team_id.value())
        .fetch_all(self.conn()?)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list leadership history: {}", e)))?;

        rows.iter().map(row_to_record).collect()
    }
}

#[async_trait]
impl StoreTransaction for PostgresTransaction {
    async fn commit(&mut self) -> Result<(), DomainError> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| DomainError::storage("Transaction already committed"))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))
    }
}

/// Map a write failure, turning unique violations into `Conflict`
fn write_error(
    error: sqlx::Error,
    conflict: impl FnOnce() -> DomainError,
    context: &str,
) -> DomainError {
    let unique_violation = error
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);

    if unique_violation {
        conflict()
    } else {
        DomainError::storage(format!("{}: {}", context, error))
    }
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::storage(format!("Failed to read column '{}': {}", name, e)))
}

fn row_to_team(row: &PgRow) -> Result<Team, DomainError> {
    let id = TeamId::new(column(row, "id")?)
        .map_err(|e| DomainError::storage(format!("Invalid team ID in database: {}", e)))?;
    let name: String = column(row, "name")?;
    let deleted: bool = column(row, "deleted")?;
    let created_at: DateTime<Utc> = column(row, "created_at")?;

    Ok(Team::restore(id, name, deleted, created_at))
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let id = UserId::new(column(row, "id")?)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;
    let name: String = column(row, "name")?;
    let email: String = column(row, "email")?;
    let deleted: bool = column(row, "deleted")?;

    Ok(User::restore(id, name, email, deleted))
}

fn row_to_membership(row: &PgRow) -> Result<Membership, DomainError> {
    let id = MembershipId::new(column(row, "id")?);
    let user_id = UserId::new(column(row, "user_id")?)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;
    let team_id = TeamId::new(column(row, "team_id")?)
        .map_err(|e| DomainError::storage(format!("Invalid team ID in database: {}", e)))?;
    let status: String = column(row, "status")?;
    let joined_at: DateTime<Utc> = column(row, "joined_at")?;

    Ok(Membership::restore(
        id,
        user_id,
        team_id,
        str_to_status(&status),
        joined_at,
    ))
}

fn row_to_record(row: &PgRow) -> Result<LeadershipRecord, DomainError> {
    let id = LeadershipRecordId::new(column(row, "id")?);
    let team_id = TeamId::new(column(row, "team_id")?)
        .map_err(|e| DomainError::storage(format!("Invalid team ID in database: {}", e)))?;
    let leader_id = UserId::new(column(row, "leader_id")?)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;
    let started_at: DateTime<Utc> = column(row, "started_at")?;
    let ended_at: Option<DateTime<Utc>> = column(row, "ended_at")?;

    Ok(LeadershipRecord::restore(
        id, team_id, leader_id, started_at, ended_at,
    ))
}

/// Unknown statuses are treated as inactive so they never count toward the
/// one-active-membership rule
fn str_to_status(s: &str) -> MembershipStatus {
    s.parse().unwrap_or(MembershipStatus::Inactive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion() {
        assert_eq!(str_to_status("active"), MembershipStatus::Active);
        assert_eq!(str_to_status("inactive"), MembershipStatus::Inactive);
        assert_eq!(str_to_status("removed"), MembershipStatus::Inactive);
    }

    #[test]
    fn test_config_builder() {
        let config = PostgresConfig::new("postgres://db/leadership")
            .with_max_connections(4)
            .with_acquire_timeout(5);

        assert_eq!(config.url, "postgres://db/leadership");
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.acquire_timeout_secs, 5);
    }

    #[test]
    fn test_non_database_errors_are_storage_errors() {
        let error = write_error(
            sqlx::Error::RowNotFound,
            || DomainError::conflict("duplicate"),
            "Failed to insert",
        );

        assert!(matches!(error, DomainError::Storage { .. }));
    }
}
