//! Team leadership domain
//!
//! A team has at most one active leader at a time. Every term is kept as a
//! [`LeadershipRecord`] so the full history of who led the team survives
//! leader changes and removals.

mod entity;
mod repository;
mod view;

pub use entity::{LeadershipRecord, LeadershipRecordId};
pub use repository::LeadershipRepository;
pub use view::{HistoryEntry, LeaderInfo};
