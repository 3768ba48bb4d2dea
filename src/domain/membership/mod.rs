//! Team membership domain

mod entity;
mod repository;

pub use entity::{Membership, MembershipId, MembershipStatus};
pub use repository::MembershipRepository;
