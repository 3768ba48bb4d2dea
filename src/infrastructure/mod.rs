//! Infrastructure layer - Storage backends and service implementations

pub mod leadership;
pub mod logging;
pub mod storage;
