//! Storage abstractions

mod transaction;

pub use transaction::{LeadershipStore, StoreTransaction};
