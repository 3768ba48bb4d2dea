//! Membership entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::team::TeamId;
use crate::domain::user::UserId;

/// Membership identifier assigned by the store on first save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipId(i64);

impl MembershipId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for MembershipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// User currently belongs to the team
    #[default]
    Active,
    /// User left or was removed from the team
    Inactive,
}

impl MembershipStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MembershipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("Unknown membership status '{}'", other)),
        }
    }
}

/// Ties one user to one team
///
/// A user holds at most one active membership system-wide. Memberships are
/// never deleted, only moved to [`MembershipStatus::Inactive`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    id: Option<MembershipId>,
    user_id: UserId,
    team_id: TeamId,
    status: MembershipStatus,
    joined_at: DateTime<Utc>,
}

impl Membership {
    /// Create a new active membership joined now
    pub fn new(user_id: UserId, team_id: TeamId) -> Self {
        Self {
            id: None,
            user_id,
            team_id,
            status: MembershipStatus::Active,
            joined_at: Utc::now(),
        }
    }

    /// Rebuild a membership from persisted state
    pub fn restore(
        id: MembershipId,
        user_id: UserId,
        team_id: TeamId,
        status: MembershipStatus,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            user_id,
            team_id,
            status,
            joined_at,
        }
    }

    /// Attach the store-assigned ID
    pub fn with_id(mut self, id: MembershipId) -> Self {
        self.id = Some(id);
        self
    }

    // Getters

    /// `None` until the membership has been saved
    pub fn id(&self) -> Option<MembershipId> {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    pub fn status(&self) -> MembershipStatus {
        self.status
    }

    pub fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Mark the membership inactive
    pub fn deactivate(&mut self) {
        self.status = MembershipStatus::Inactive;
    }
}
