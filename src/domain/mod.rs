//! Domain layer - Core business logic and entities

pub mod error;
pub mod leadership;
pub mod membership;
pub mod storage;
pub mod team;
pub mod user;

pub use error::DomainError;
pub use leadership::{
    HistoryEntry, LeaderInfo, LeadershipRecord, LeadershipRecordId, LeadershipRepository,
};
pub use membership::{Membership, MembershipId, MembershipRepository, MembershipStatus};
pub use storage::{LeadershipStore, StoreTransaction};
pub use team::{Team, TeamId, TeamRepository};
pub use user::{User, UserId, UserRepository};
