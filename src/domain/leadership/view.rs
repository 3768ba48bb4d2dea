//! Read models returned by leadership operations

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entity::{LeadershipRecord, LeadershipRecordId};
use crate::domain::user::{User, UserId};

/// The leader of a team for one term
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderInfo {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub started_at: DateTime<Utc>,
}

impl LeaderInfo {
    pub fn new(user: &User, record: &LeadershipRecord) -> Self {
        Self {
            user_id: user.id(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            started_at: record.started_at(),
        }
    }
}

/// One row of a team's leadership history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub record_id: Option<LeadershipRecordId>,
    pub leader_id: UserId,
    pub leader_name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub is_current: bool,
}

impl HistoryEntry {
    pub fn new(leader: &User, record: &LeadershipRecord) -> Self {
        Self {
            record_id: record.id(),
            leader_id: record.leader_id(),
            leader_name: leader.name().to_string(),
            started_at: record.started_at(),
            ended_at: record.ended_at(),
            is_current: record.is_active(),
        }
    }
}
