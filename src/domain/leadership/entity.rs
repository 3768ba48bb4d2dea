//! Leadership record entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::team::TeamId;
use crate::domain::user::UserId;

/// Leadership record identifier assigned by the store on first save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadershipRecordId(i64);

impl LeadershipRecordId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for LeadershipRecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One leadership term of a user over a team
///
/// A record with no `ended_at` is the team's active leadership. Records are
/// append-only: a term is closed by setting `ended_at`, and a new leader
/// always gets a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadershipRecord {
    id: Option<LeadershipRecordId>,
    team_id: TeamId,
    leader_id: UserId,
    started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ended_at: Option<DateTime<Utc>>,
}

impl LeadershipRecord {
    /// Open a new active term starting at `started_at`
    pub fn start(team_id: TeamId, leader_id: UserId, started_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            team_id,
            leader_id,
            started_at,
            ended_at: None,
        }
    }

    /// Rebuild a record from persisted state
    pub fn restore(
        id: LeadershipRecordId,
        team_id: TeamId,
        leader_id: UserId,
        started_at: DateTime<Utc>,
        ended_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Some(id),
            team_id,
            leader_id,
            started_at,
            ended_at,
        }
    }

    /// Attach the store-assigned ID
    pub fn with_id(mut self, id: LeadershipRecordId) -> Self {
        self.id = Some(id);
        self
    }

    // Getters

    /// `None` until the record has been saved
    pub fn id(&self) -> Option<LeadershipRecordId> {
        self.id
    }

    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    pub fn leader_id(&self) -> UserId {
        self.leader_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Close the term at `ended_at`. Already ended terms keep their end time.
    pub fn end(&mut self, ended_at: DateTime<Utc>) {
        if self.ended_at.is_none() {
            self.ended_at = Some(ended_at);
        }
    }
}
