//! Leadership infrastructure implementations

mod service;

pub use service::LeadershipService;
