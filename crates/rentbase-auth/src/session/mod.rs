//! Session lifecycle orchestration and expiry sweeping.

pub mod lifecycle;
pub mod sweeper;

pub use lifecycle::{LoginResult, SessionLifecycle};
pub use sweeper::ExpirySweeper;
