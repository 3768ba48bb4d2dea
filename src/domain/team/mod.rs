//! Team domain module
//!
//! Teams are the organizational unit that leaders and members attach to.

mod entity;
mod repository;

pub use entity::{Team, TeamId};
pub use repository::TeamRepository;
